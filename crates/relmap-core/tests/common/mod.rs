use relmap_core::{Child, Parent, Store};

/// Create a new empty Store for testing
#[allow(dead_code)]
pub fn new_store() -> Store {
    Store::new()
}

/// Create a Store holding unlinked Parents and Children with the given keys
#[allow(dead_code)]
pub fn store_with(parent_ids: &[i64], child_ids: &[i64]) -> Store {
    let mut store = Store::new();
    for id in parent_ids {
        store.insert_parent(Parent::new(*id)).unwrap();
    }
    for id in child_ids {
        store.insert_child(Child::new(*id)).unwrap();
    }
    store
}

/// Keys of a parent's children collection, in order
#[allow(dead_code)]
pub fn child_ids(store: &Store, parent_id: i64) -> Vec<i64> {
    store.get_parent(parent_id).unwrap().child_ids().to_vec()
}
