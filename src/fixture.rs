//! Fixtures for tests
use rstest::fixture;

use crate::batch::{Batch, Edge, Node, NodeStatus, Supply};

pub fn node(id: &str, delay: i64) -> Node {
    Node::new(id).with_delay(delay)
}

pub fn edge(source: &str, target: &str, duration: &str) -> Edge {
    Edge::new(source, target, duration)
}

/// A -> B -> C with 2h and 3h legs and a 1h delay at B
#[fixture]
pub fn chain_batch() -> Batch {
    Batch::new(
        vec![node("A", 0), node("B", 1), node("C", 0)],
        vec![edge("A", "B", "2 hours"), edge("B", "C", "3 hours")],
    )
}

/// S splits to L and R, both merge into T.
/// S-L-T takes 5 hours, S-R-T takes 3 hours.
#[fixture]
pub fn diamond_batch() -> Batch {
    Batch::new(
        vec![node("S", 0), node("L", 0), node("R", 0), node("T", 0)],
        vec![
            edge("S", "L", "1 hours"),
            edge("S", "R", "2 hours"),
            edge("L", "T", "4 hours"),
            edge("R", "T", "1 hours"),
        ],
    )
}

/// X -> Y -> Z plus an unrelated W -> V branch
#[fixture]
pub fn branching_batch() -> Batch {
    Batch::new(
        vec![
            node("W", 0),
            node("X", 0),
            node("Y", 0),
            node("Z", 0),
            node("V", 0),
        ],
        vec![
            edge("X", "Y", "4 hours"),
            edge("Y", "Z", "6 hours"),
            edge("W", "V", "2 hours"),
        ],
    )
}

/// A fully described batch with labels, timestamps and supplies
#[fixture]
pub fn labelled_batch() -> Batch {
    let mut farm = node("farm", 0);
    farm.label = "Farm".into();
    farm.timestamp = "2024-06-15T08:05:00Z".into();
    farm.location = "Valencia".into();
    farm.status = NodeStatus::Active;

    let mut hub = node("hub", 2);
    hub.label = "Hub".into();
    hub.timestamp = "2024-06-15 14:30:00".into();
    hub.location = "Madrid".into();

    let mut store = node("store", 0);
    store.label = "Store".into();
    store.timestamp = "not a time".into();
    store.location = "Paris".into();
    store.status = NodeStatus::Spoiled;

    let mut split_leg = edge("hub", "store", "9 hours");
    split_leg.quantity_percentage = Some("40".into());
    split_leg.mode_of_transport = Some("Rail".into());

    let mut outlet = node("outlet", 0);
    outlet.label = "Outlet".into();

    Batch {
        supplies: vec![Supply {
            id: "oranges".into(),
            quantity: "500".into(),
            life: 72,
        }],
        nodes: vec![farm, hub, store, outlet],
        edges: vec![
            edge("farm", "hub", "5 hours"),
            split_leg,
            edge("hub", "outlet", "3 hours"),
        ],
    }
}
