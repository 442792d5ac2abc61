#![cfg(feature = "surreal")]

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurrealProtocol {
    Ws,
    Http,
}

#[derive(Clone, Debug)]
pub struct SurrealCredentials {
    pub username: String,
    pub password: String,
}

impl SurrealCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SurrealConfig {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub protocol: SurrealProtocol,
    pub credentials: Option<SurrealCredentials>,
    pub max_connections: usize,
    /// Probe the database during connect and fail fast when it is unreachable.
    pub strict: bool,
}

impl Default for SurrealConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8000".into(),
            namespace: "dal".into(),
            database: "layouts".into(),
            protocol: SurrealProtocol::Ws,
            credentials: None,
            max_connections: 8,
            strict: true,
        }
    }
}

impl SurrealConfig {
    pub fn with_credentials(mut self, credentials: SurrealCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_protocol(mut self, protocol: SurrealProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_pool(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Endpoint without a URL scheme; the client engine adds its own.
    pub fn address(&self) -> &str {
        ["ws://", "http://"]
            .iter()
            .find_map(|scheme| self.endpoint.strip_prefix(scheme))
            .unwrap_or(&self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_drops_scheme() {
        let config = SurrealConfig {
            endpoint: "ws://db.internal:8000".into(),
            ..SurrealConfig::default()
        };
        assert_eq!(config.address(), "db.internal:8000");
        assert_eq!(SurrealConfig::default().address(), "127.0.0.1:8000");
    }

    #[test]
    fn pool_is_never_empty() {
        assert_eq!(SurrealConfig::default().with_pool(0).max_connections, 1);
    }
}
