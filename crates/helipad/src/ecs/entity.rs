//! Entity implementation

use slotmap::new_key_type;

new_key_type! {
    /// Entity identifier
    ///
    /// Generational: once an entity is destroyed its id never resolves again,
    /// even after the slot is reused.
    pub struct Entity;
}
