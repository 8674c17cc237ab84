//! End-to-end layouts through the public `LayoutTree` API.
//!
//! Each test builds a small tree the way an application would, resolves it
//! for a fixed outer region and checks the rectangles handed to the panels.

use std::rc::Rc;

use mosaic_layout::{
    FlexGrid, Grouping, LayoutConfig, LayoutError, LayoutNode, LayoutTree, NodePath, Rect,
    StaticPanel, YAxis, ZeroWeightPolicy, flex, tabs,
};

fn panel(width: u32, height: u32) -> Rc<StaticPanel> {
    StaticPanel::new((width, height)).shared()
}

fn widths(tree: &LayoutTree, parent: &[usize]) -> Vec<u32> {
    let count = tree.node(parent).expect("parent").children().len();
    (0..count)
        .map(|index| {
            let mut path = parent.to_vec();
            path.push(index);
            tree.region(&path).expect("region").width
        })
        .collect()
}

#[test]
fn proportional_fill_by_weight() {
    let a = panel(50, 10);
    let b = panel(50, 10);
    let c = panel(50, 10);
    let root = LayoutNode::leaf(a.clone()) | b.clone() | LayoutNode::leaf(c.clone()).with_weight(2.0);
    let mut tree = LayoutTree::new(root);
    tree.layout(Rect::from_size(400, 300)).expect("layout");

    assert_eq!(widths(&tree, &[]), [112, 113, 175]);
    assert_eq!(a.region(), Some(Rect::new(0, 0, 112, 300)));
    assert_eq!(b.region(), Some(Rect::new(112, 0, 113, 300)));
    assert_eq!(c.region(), Some(Rect::new(225, 0, 175, 300)));
}

#[test]
fn zero_weight_leftover_goes_to_last_child() {
    let top = panel(0, 30);
    let bottom = panel(0, 40);
    let root = LayoutNode::leaf(top.clone()).with_weight(0.0)
        / LayoutNode::leaf(bottom.clone()).with_weight(0.0);
    let mut tree = LayoutTree::new(root);
    tree.layout(Rect::from_size(80, 100)).expect("layout");

    assert_eq!(top.region(), Some(Rect::new(0, 0, 80, 30)));
    assert_eq!(bottom.region(), Some(Rect::new(0, 30, 80, 70)));
}

#[test]
fn zero_weight_leftover_can_be_split_evenly() {
    let root = LayoutNode::leaf(panel(0, 30)).with_weight(0.0)
        / LayoutNode::leaf(panel(0, 40)).with_weight(0.0);
    let config = LayoutConfig::default().zero_weight_policy(ZeroWeightPolicy::Equal);
    let mut tree = LayoutTree::with_config(root, config);
    tree.layout(Rect::from_size(80, 100)).expect("layout");

    assert_eq!(tree.region([0]).map(|r| r.height), Ok(45));
    assert_eq!(tree.region([1]).map(|r| r.height), Ok(55));
}

#[test]
fn selected_tab_gets_the_whole_region() {
    let panels = [panel(0, 0), panel(0, 0), panel(0, 0)];
    let root = tabs(panels.iter()).expect("tabs").with_selected_tab(1);
    let mut tree = LayoutTree::new(root);
    let area = Rect::new(20, 10, 200, 100);
    tree.layout(area).expect("layout");

    assert_eq!(panels[1].region(), Some(area));
    assert_eq!(panels[0].region(), Some(Rect::new(20, 10, 0, 0)));
    assert_eq!(panels[2].region(), Some(Rect::new(20, 10, 0, 0)));
    assert_eq!(tree.is_rendered([1]), Ok(true));
    assert_eq!(tree.is_rendered([0]), Ok(false));

    tree.select_tab(NodePath::root(), 2).expect("select");
    tree.layout(area).expect("relayout");
    assert_eq!(panels[2].region(), Some(area));
    assert!(panels[1].region().is_some_and(|r| r.is_empty()));
}

#[test]
fn flex_packs_square_children_two_by_two() {
    let panels: Vec<_> = (0..4)
        .map(|_| StaticPanel::for_image((640, 640)).shared())
        .collect();
    let mut tree = LayoutTree::new(flex(panels.iter()).expect("flex"));
    tree.layout(Rect::from_size(400, 200)).expect("layout");

    assert_eq!(
        tree.constraints(NodePath::root()).expect("constraints").grid,
        Some(FlexGrid::new(2, 2))
    );
    let regions: Vec<_> = panels.iter().filter_map(|p| p.region()).collect();
    assert_eq!(
        regions,
        [
            Rect::new(100, 0, 100, 100),
            Rect::new(200, 0, 100, 100),
            Rect::new(100, 100, 100, 100),
            Rect::new(200, 100, 100, 100),
        ]
    );
}

#[test]
fn flex_regrids_when_strictly_better() {
    let panels: Vec<_> = (0..4)
        .map(|_| StaticPanel::for_image((10, 10)).shared())
        .collect();
    let mut tree = LayoutTree::new(flex(panels.iter()).expect("flex"));
    tree.layout(Rect::from_size(800, 100)).expect("layout");
    let regions: Vec<_> = panels.iter().filter_map(|p| p.region()).collect();
    assert_eq!(
        regions,
        [
            Rect::new(200, 0, 100, 100),
            Rect::new(300, 0, 100, 100),
            Rect::new(400, 0, 100, 100),
            Rect::new(500, 0, 100, 100),
        ]
    );
}

#[test]
fn flex_grid_keeps_tied_choice_across_resizes() {
    let panels: Vec<_> = (0..4)
        .map(|_| StaticPanel::for_image((10, 10)).shared())
        .collect();
    let mut tree = LayoutTree::new(flex(panels.iter()).expect("flex"));
    tree.layout(Rect::from_size(800, 100)).expect("wide");
    tree.layout(Rect::from_size(400, 200)).expect("square-ish");

    // 1x4 and 2x2 tie in 400x200; the grid picked for 800x100 stays.
    assert_eq!(
        tree.constraints(NodePath::root()).expect("constraints").grid,
        Some(FlexGrid::new(1, 4))
    );
    let regions: Vec<_> = panels.iter().filter_map(|p| p.region()).collect();
    assert_eq!(
        regions,
        [
            Rect::new(0, 50, 100, 100),
            Rect::new(100, 50, 100, 100),
            Rect::new(200, 50, 100, 100),
            Rect::new(300, 50, 100, 100),
        ]
    );
}

#[test]
fn deserialized_config_with_negative_tolerance_still_packs() {
    let config: LayoutConfig =
        serde_json::from_str(r#"{ "aspect_tolerance": -0.5 }"#).expect("config");
    let panels: Vec<_> = (0..2)
        .map(|_| StaticPanel::for_image((10, 10)).shared())
        .collect();
    let mut tree = LayoutTree::with_config(flex(panels.iter()).expect("flex"), config);
    tree.layout(Rect::from_size(200, 100)).expect("layout");
    assert_eq!(panels[1].region(), Some(Rect::new(100, 0, 100, 100)));
}

#[test]
fn hiding_a_spliced_operand_leaves_siblings_rendered() {
    let a = panel(10, 10);
    let b = panel(10, 10);
    let c = panel(10, 10);
    let mut row = LayoutNode::leaf(a.clone()) | b.clone();
    row.hide();

    let mut tree = LayoutTree::new(row.clone() | c.clone());
    tree.layout(Rect::from_size(300, 100)).expect("layout");
    assert!(tree.root().is_shown());
    assert_eq!(tree.root().children().len(), 3);
    assert_eq!(tree.is_rendered([2]), Ok(true));

    let mut mirrored = LayoutTree::new(LayoutNode::leaf(c.clone()) | row);
    mirrored.layout(Rect::from_size(300, 100)).expect("layout");
    assert!(mirrored.root().is_shown());
    assert_eq!(mirrored.is_rendered([0]), Ok(true));
    assert_eq!(
        tree.rendered_leaves().expect("leaves").len(),
        mirrored.rendered_leaves().expect("leaves").len()
    );
}

#[test]
fn flex_rejects_mixed_aspect_ratios() {
    let square = StaticPanel::for_image((10, 10)).shared();
    let wide = StaticPanel::for_image((20, 10)).shared();
    let root = flex([square, wide]).expect("flex").with_label("thumbs");
    let mut tree = LayoutTree::new(root);
    let err = tree.layout(Rect::from_size(100, 100)).unwrap_err();
    assert!(matches!(err, LayoutError::InconsistentFlexAspect { child: 1, .. }));
    assert!(err.to_string().contains("'thumbs' at root"));
}

#[test]
fn y_axis_up_places_first_child_on_top() {
    let top = panel(0, 0);
    let bottom = panel(0, 0);
    let root = LayoutNode::leaf(top.clone()) / bottom.clone();
    let config = LayoutConfig::default().y_axis(YAxis::Up);
    let mut tree = LayoutTree::with_config(root, config);
    tree.layout(Rect::from_size(100, 100)).expect("layout");

    assert_eq!(top.region(), Some(Rect::new(0, 50, 100, 50)));
    assert_eq!(bottom.region(), Some(Rect::new(0, 0, 100, 50)));
}

#[test]
fn nested_application_layout() {
    let toolbar = panel(0, 24);
    let tree_view = panel(150, 0);
    let editor = panel(200, 100);
    let preview = panel(200, 100);
    let status = panel(0, 16);

    let toolbar_node = LayoutNode::leaf(toolbar.clone()).with_weight((1.0, 0.0));
    let status_node = LayoutNode::leaf(status.clone()).with_weight((1.0, 0.0));
    let sidebar = LayoutNode::leaf(tree_view.clone()).with_weight((0.0, 1.0));
    let documents = tabs([editor.clone(), preview.clone()]).expect("tabs");
    let root = toolbar_node / (sidebar | documents) / status_node;

    assert_eq!(root.grouping(), Some(Grouping::Vertical));
    assert_eq!(root.children().len(), 3);

    let mut tree = LayoutTree::new(root);
    tree.layout(Rect::from_size(1024, 768)).expect("layout");

    assert_eq!(toolbar.region(), Some(Rect::new(0, 0, 1024, 24)));
    assert_eq!(tree_view.region(), Some(Rect::new(0, 24, 150, 728)));
    assert_eq!(editor.region(), Some(Rect::new(150, 24, 874, 728)));
    assert_eq!(preview.region(), Some(Rect::new(150, 24, 0, 0)));
    assert_eq!(status.region(), Some(Rect::new(0, 752, 1024, 16)));

    let rendered: Vec<_> = tree
        .rendered_leaves()
        .expect("leaves")
        .into_iter()
        .map(|leaf| leaf.path.to_string())
        .collect();
    assert_eq!(rendered, ["root/0", "root/1/0", "root/1/1/0", "root/2"]);
}

#[test]
fn snapshot_serializes_to_json() {
    let mut tree = LayoutTree::new(LayoutNode::leaf(panel(10, 10)).with_label("only"));
    tree.layout(Rect::from_size(30, 20)).expect("layout");
    let json = serde_json::to_value(tree.snapshot()).expect("serialize");

    assert_eq!(json["generation"], 0);
    assert_eq!(json["area"]["width"], 30);
    let node = &json["nodes"][0];
    assert_eq!(node["path"], serde_json::json!([]));
    assert_eq!(node["kind"], "leaf");
    assert_eq!(node["label"], "only");
    assert_eq!(node["min_size"]["height"], 10);
    assert_eq!(node["region"]["height"], 20);
    assert!(node.get("grouping").is_none());
}
