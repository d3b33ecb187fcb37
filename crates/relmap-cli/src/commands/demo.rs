//! Demo command
//!
//! Usage: relmap demo [--database <URL>] [--echo]
//!
//! Links Child(5) through its back-reference and Child(7) through the
//! parent's collection, stages only Child(5), commits, and prints:
//! the parent's child ids, child 5's parent id, the stored children, and
//! the mapped columns of Child.

use relmap_core::model::{Child, EntityKey, Parent};
use relmap_core::ops::{append_child, children_of, parent_of, set_parent, Store};
use relmap_core::{inspect, model};
use relmap_store::{EngineConfig, Session};

/// Execute demo command
pub fn execute(config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    for line in run(config)? {
        println!("{}", line);
    }
    Ok(())
}

/// Run the demo and return its output lines
pub fn run(config: &EngineConfig) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let registry = model::registry()?;
    let mut session = Session::open(config, &registry)?;

    let mut store = Store::new();
    store.insert_parent(Parent::new(1))?;
    store.insert_child(Child::new(5))?;
    store.insert_child(Child::new(7))?;

    set_parent(&mut store, 5, Some(1))?;
    append_child(&mut store, 1, 7)?;

    let mut lines = Vec::new();

    let child_ids: Vec<i64> = children_of(&store, 1)?.iter().map(|c| c.id()).collect();
    lines.push(format!("{:?}", child_ids));

    let parent = parent_of(&store, 5)?.ok_or("child 5 has no parent")?;
    lines.push(parent.id().to_string());

    session.add(&store, EntityKey::Child(5))?;
    session.commit(&mut store)?;

    let stored: Vec<String> = session
        .query_children()?
        .iter()
        .map(|c| c.to_string())
        .collect();
    lines.push(format!("[{}]", stored.join(", ")));

    let columns: Vec<String> = inspect::<Child>().iter().map(|c| c.to_string()).collect();
    lines.push(format!("[{}]", columns.join(", ")));

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_output() {
        let lines = run(&EngineConfig::default()).unwrap();

        assert_eq!(lines[0], "[5, 7]");
        assert_eq!(lines[1], "1");
        assert_eq!(
            lines[2],
            "[<Child(id=5, parent_id=1)>, <Child(id=7, parent_id=1)>]"
        );
        assert_eq!(
            lines[3],
            "[Column('id', Integer(), table=<child>, primary_key=True, nullable=False), \
             Column('parent_id', Integer(), ForeignKey('parent.id'), table=<child>)]"
        );
    }
}
