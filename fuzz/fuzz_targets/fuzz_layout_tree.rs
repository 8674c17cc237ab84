#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mosaic_core::geometry::Rect;
use mosaic_layout::{Grouping, LayoutNode, LayoutTree, NodePath, StaticPanel};

#[derive(Arbitrary, Debug)]
enum Shape {
    Leaf {
        width: u16,
        height: u16,
        weight: (u8, u8),
        aspect: Option<(u8, u8)>,
    },
    Group {
        grouping: u8,
        selected_tab: u8,
        children: Vec<Shape>,
    },
}

#[derive(Arbitrary, Debug)]
enum Step {
    Layout { origin: (u32, u32), width: u16, height: u16 },
    SelectTab { node: u8, tab: u8 },
    Toggle { node: u8 },
    HitTest { x: u16, y: u16 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    root: Shape,
    steps: Vec<Step>,
}

const GROUPINGS: [Grouping; 5] = [
    Grouping::Tabbed,
    Grouping::Horizontal,
    Grouping::Vertical,
    Grouping::Stacked,
    Grouping::Flex,
];

fn build(shape: &Shape, depth: usize) -> LayoutNode {
    match shape {
        Shape::Group {
            grouping,
            selected_tab,
            children,
        } if depth < 8 => {
            let grouping = GROUPINGS[usize::from(*grouping) % GROUPINGS.len()];
            let children = children.iter().take(8).map(|c| build(c, depth + 1)).collect();
            LayoutNode::group(grouping, children).with_selected_tab(usize::from(*selected_tab % 4))
        }
        Shape::Group { .. } => LayoutNode::leaf(StaticPanel::new((1, 1)).shared()),
        Shape::Leaf {
            width,
            height,
            weight,
            aspect,
        } => {
            let mut panel = StaticPanel::new((u32::from(*width), u32::from(*height)));
            if let Some((w, h)) = aspect {
                panel = panel.with_aspect_ratio(f64::from(*w) / f64::from(*h));
            }
            LayoutNode::leaf(panel.shared())
                .with_weight((f64::from(weight.0 % 4), f64::from(weight.1 % 4)))
        }
    }
}

fn node_paths(tree: &LayoutTree) -> Vec<NodePath> {
    let mut out = Vec::new();
    tree.root().walk(&mut |path, _| out.push(path.clone()));
    out
}

fn check_splits(tree: &LayoutTree) {
    for path in node_paths(tree) {
        let node = tree.node(&path).expect("walked path exists");
        let Some(axis) = node.grouping().and_then(Grouping::axis) else {
            continue;
        };
        let parent = axis.extent(tree.region(&path).expect("resolved").size());
        let total: u32 = (0..node.children().len())
            .map(|i| axis.extent(tree.region(path.child(i)).expect("resolved").size()))
            .sum();
        assert_eq!(total, parent, "split at {path} does not conserve space");
    }
}

fuzz_target!(|input: Input| {
    let mut tree = LayoutTree::new(build(&input.root, 0));
    let mut valid = false;

    for step in input.steps.iter().take(32) {
        match *step {
            Step::Layout {
                origin,
                width,
                height,
            } => {
                // Origins near u32::MAX push child offsets past the limit.
                let area = Rect::new(origin.0, origin.1, u32::from(width), u32::from(height));
                valid = tree.layout(area).is_ok();
                if valid {
                    assert_eq!(tree.region(NodePath::root()), Ok(area));
                    check_splits(&tree);
                } else {
                    assert!(tree.region(NodePath::root()).is_err());
                }
            }
            Step::SelectTab { node, tab } => {
                let paths = node_paths(&tree);
                let path = &paths[usize::from(node) % paths.len()];
                let _ = tree.select_tab(path, usize::from(tab % 4));
            }
            Step::Toggle { node } => {
                let paths = node_paths(&tree);
                let path = &paths[usize::from(node) % paths.len()];
                let shown = tree.node(path).expect("walked path exists").is_shown();
                tree.show_node(path, !shown).expect("walked path exists");
            }
            Step::HitTest { x, y } => {
                if let Ok(Some(hit)) = tree.hit_test(f64::from(x), f64::from(y)) {
                    assert!(valid);
                    assert!(hit.region.contains_point(f64::from(x), f64::from(y)));
                    assert_eq!(tree.is_rendered(&hit.path), Ok(true));
                }
            }
        }
    }
    let _ = tree.dump();
    let _ = tree.to_dot();
});
