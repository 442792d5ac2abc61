use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use rand::Rng;

string_id!(
    /// Primary key of a layout document.
    LayoutId
);

string_id!(
    /// The user who created a record.
    UserId
);

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| rand::thread_rng().gen());
static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::thread_rng().gen::<u32>() & COUNTER_MASK));

/// Generates a 24 character hex identifier laid out like a document-store
/// ObjectId: 4 bytes of unix seconds, 5 process-unique bytes, 3 counter bytes.
///
/// Ids generated by one process sort in creation order as long as the counter
/// does not wrap within a single second.
pub fn new_object_id() -> String {
    let secs = crate::time::Timestamp::now().as_millis().div_euclid(1000) as u32;
    let count = COUNTER.fetch_add(1, Ordering::SeqCst) & COUNTER_MASK;
    object_id_from_parts(secs, &PROCESS_UNIQUE, count)
}

fn object_id_from_parts(secs: u32, unique: &[u8; 5], count: u32) -> String {
    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(unique);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Returns `true` when `value` has the shape produced by [`new_object_id`].
pub fn is_object_id(value: &str) -> bool {
    value.len() == 24 && value.chars().all(|c| c.is_ascii_hexdigit())
}

impl LayoutId {
    pub fn generate() -> Self {
        Self(new_object_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_layout() {
        let id = object_id_from_parts(0x0102_0304, &[0xaa; 5], 0x00ab_cdef);
        assert_eq!(id, "01020304aaaaaaaaaaabcdef");
        assert!(is_object_id(&id));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = new_object_id();
        let b = new_object_id();
        assert!(is_object_id(&a));
        assert!(is_object_id(&b));
        assert_ne!(a, b);
        assert_eq!(a[8..18], b[8..18]);
    }
}
