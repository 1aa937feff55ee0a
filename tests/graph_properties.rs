use std::collections::HashSet;

use mindmap_canvas::{
	AttributePatch, Graph, NodeAttributes, NodeId, Position, Shape, Size,
};
use mindmap_canvas::json;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
	AddNode { x: i16, y: i16 },
	AddEdge { a: u16, b: u16 },
	/// Screen-space drag at `zoom_steps` toolbar zooms, as the canvas does it.
	Drag { a: u16, dx: i16, dy: i16, zoom_steps: i32 },
	Delete { picks: Vec<u16> },
	Update { picks: Vec<u16>, shape: Option<u8>, size: Option<u8>, label: Option<String> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
	prop_oneof![
		(any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode { x, y }),
		(any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::AddEdge { a, b }),
		(any::<u16>(), any::<i16>(), any::<i16>(), -3i32..4).prop_map(|(a, dx, dy, zoom_steps)| {
			Op::Drag { a, dx, dy, zoom_steps }
		}),
		prop::collection::vec(any::<u16>(), 0..3).prop_map(|picks| Op::Delete { picks }),
		(
			prop::collection::vec(any::<u16>(), 0..3),
			prop::option::of(0u8..4),
			prop::option::of(0u8..3),
			prop::option::of("[a-z ]{0,12}"),
		)
			.prop_map(|(picks, shape, size, label)| Op::Update {
				picks,
				shape,
				size,
				label,
			}),
	]
}

fn pick(g: &Graph, i: u16) -> Option<NodeId> {
	let n = g.nodes().len();
	(n > 0).then(|| g.nodes()[i as usize % n].id.clone())
}

fn picks(g: &Graph, list: &[u16]) -> HashSet<NodeId> {
	list.iter().filter_map(|&i| pick(g, i)).collect()
}

fn apply(g: &mut Graph, op: &Op) {
	match op {
		Op::AddNode { x, y } => {
			g.add_node(
				NodeAttributes::with_label("n"),
				Position::new(*x as f64, *y as f64),
			);
		}
		Op::AddEdge { a, b } => {
			if let (Some(a), Some(b)) = (pick(g, *a), pick(g, *b)) {
				let _ = g.add_edge(&a, &b);
			}
		}
		Op::Drag { a, dx, dy, zoom_steps } => {
			if let Some(id) = pick(g, *a) {
				let k = 1.2f64.powi(*zoom_steps);
				let Some(origin) = g.node(&id).map(|n| n.position) else {
					return;
				};
				g.move_node(&id, origin.offset(*dx as f64 / k, *dy as f64 / k));
			}
		}
		Op::Delete { picks: list } => {
			let ids = picks(g, list);
			g.delete_nodes(&ids);
		}
		Op::Update {
			picks: list,
			shape,
			size,
			label,
		} => {
			let ids = picks(g, list);
			let patch = AttributePatch {
				label: label.clone(),
				shape: shape.map(|i| Shape::ALL[i as usize]),
				size: size.map(|i| Size::ALL[i as usize]),
				..AttributePatch::default()
			};
			g.update_node_attributes(&ids, &patch);
		}
	}
}

fn assert_no_dangling(g: &Graph) {
	let ids: HashSet<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids.len(), g.nodes().len(), "node ids must be unique");
	for e in g.edges() {
		assert!(ids.contains(e.source.as_str()), "dangling source in {e:?}");
		assert!(ids.contains(e.target.as_str()), "dangling target in {e:?}");
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(128))]

	#[test]
	fn edges_never_dangle(ops in prop::collection::vec(op_strategy(), 1..60)) {
		let mut g = Graph::new();
		for op in &ops {
			apply(&mut g, op);
			assert_no_dangling(&g);
		}
	}

	#[test]
	fn delete_removes_exactly_incident_edges(
		ops in prop::collection::vec(op_strategy(), 1..40),
		victims in prop::collection::vec(any::<u16>(), 0..4),
	) {
		let mut g = Graph::new();
		for op in &ops {
			apply(&mut g, op);
		}
		let doomed = picks(&g, &victims);
		let expected: Vec<_> = g
			.edges()
			.iter()
			.filter(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target))
			.cloned()
			.collect();
		let survivors: Vec<_> = g
			.nodes()
			.iter()
			.filter(|n| !doomed.contains(&n.id))
			.cloned()
			.collect();

		g.delete_nodes(&doomed);

		prop_assert_eq!(g.edges(), expected.as_slice());
		prop_assert_eq!(g.nodes(), survivors.as_slice());
	}

	#[test]
	fn update_is_a_shallow_merge(
		ops in prop::collection::vec(op_strategy(), 1..30),
		targets in prop::collection::vec(any::<u16>(), 0..3),
		shape in prop::option::of(0u8..4),
		color in prop::option::of("#[0-9a-f]{6}"),
	) {
		let mut g = Graph::new();
		for op in &ops {
			apply(&mut g, op);
		}
		let before = g.clone();
		let ids = picks(&g, &targets);
		let patch = AttributePatch {
			shape: shape.map(|i| Shape::ALL[i as usize]),
			background_color: color.clone(),
			..AttributePatch::default()
		};
		g.update_node_attributes(&ids, &patch);

		for (old, new) in before.nodes().iter().zip(g.nodes()) {
			prop_assert_eq!(&old.id, &new.id);
			prop_assert_eq!(old.position, new.position);
			if !ids.contains(&old.id) {
				prop_assert_eq!(old, new);
				continue;
			}
			prop_assert_eq!(new.data.shape, patch.shape.unwrap_or(old.data.shape));
			prop_assert_eq!(
				&new.data.background_color,
				color.as_ref().unwrap_or(&old.data.background_color)
			);
			prop_assert_eq!(&new.data.label, &old.data.label);
			prop_assert_eq!(new.data.size, old.data.size);
			prop_assert_eq!(&new.data.text_color, &old.data.text_color);
			prop_assert_eq!(&new.data.image, &old.data.image);
		}
		prop_assert_eq!(before.edges(), g.edges());
	}

	#[test]
	fn json_round_trip(ops in prop::collection::vec(op_strategy(), 1..40)) {
		let mut g = Graph::new();
		for op in &ops {
			apply(&mut g, op);
		}
		let back = json::from_json(&json::to_json(&g).unwrap()).unwrap();
		prop_assert_eq!(back.nodes(), g.nodes());
		prop_assert_eq!(back.edges(), g.edges());
	}
}
