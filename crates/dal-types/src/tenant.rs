string_id!(
    /// Environment that owns a record (e.g. development / production of one organization).
    EnvironmentId
);

string_id!(
    /// Organization that owns a record.
    OrganizationId
);
