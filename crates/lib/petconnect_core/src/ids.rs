// Record identifiers.
//
// Pets and contact messages are listed newest-first, so they get UUIDv7
// (timestamp-sortable) ids generated app-side. Principals use random v4 ids.

use uuid::Uuid;

/// Generate a time-ordered id for listing tables.
pub fn sortable_id() -> Uuid {
    Uuid::now_v7()
}

/// Generate a random id for principals.
pub fn random_id() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sortable_ids_are_v7_and_ordered() {
        let a = sortable_id();
        let b = sortable_id();
        assert_eq!(a.get_version(), Some(uuid::Version::SortRand));
        assert!(b >= a);
    }

    #[test]
    fn random_ids_are_v4() {
        assert_eq!(random_id().get_version(), Some(uuid::Version::Random));
    }
}
