use mockall::automock;
use uuid::Uuid;

/// Source of new identifiers. `usage` names what the id is generated for
/// so tests can hand out deterministic values per purpose.
#[automock]
pub trait UuidService {
    fn new_uuid(&self, usage: &str) -> Uuid;
}
