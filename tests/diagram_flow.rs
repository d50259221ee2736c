// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end flows through the public surface: mount a page, feed pointer
//! events, and watch the frame, the model and the callbacks together.

use rstest::{fixture, rstest};

use toposcope::geom::Point;
use toposcope::interact::{Outcome, PointerEvent};
use toposcope::model::NodeId;
use toposcope::pages::{MainGraphPage, PageError, ProcessMapPage};
use toposcope::render::CharSurface;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

#[fixture]
fn process_page() -> ProcessMapPage<CharSurface> {
    ProcessMapPage::open(CharSurface::new(160, 50).expect("surface")).expect("page")
}

#[fixture]
fn main_page() -> MainGraphPage<CharSurface> {
    MainGraphPage::open(CharSurface::new(100, 40).expect("surface")).expect("page")
}

fn toggle_point(page: &ProcessMapPage<CharSurface>, id: &str) -> Point {
    page.diagram()
        .scene()
        .group(&nid(id))
        .expect("group")
        .find("collapse-back")
        .expect("toggle")
        .rect()
        .center()
}

fn visible_ids(page: &ProcessMapPage<CharSurface>) -> Vec<String> {
    page.diagram()
        .scene()
        .groups()
        .iter()
        .map(|group| group.node_id().as_str().to_owned())
        .collect()
}

#[rstest]
fn collapse_and_expand_round_trip(mut process_page: ProcessMapPage<CharSurface>) {
    let before = visible_ids(&process_page);
    assert_eq!(before.len(), 6);

    let toggle = toggle_point(&process_page, "postgres1");
    let outcome = process_page.on_pointer(PointerEvent::left(toggle));
    assert_eq!(
        outcome,
        Outcome::Toggled {
            node_id: nid("postgres1"),
            collapsed: true,
        }
    );
    assert_eq!(visible_ids(&process_page).len(), 4);

    let frame = process_page.diagram().surface().canvas().to_string();
    assert!(!frame.contains("PID: 9876"), "collapsed child still drawn");
    assert!(frame.contains('+'), "collapsed toggle glyph missing");

    // The toggle stays where it was; clicking it again restores the
    // earlier traversal order.
    let toggle = toggle_point(&process_page, "postgres1");
    process_page.on_pointer(PointerEvent::left(toggle));
    assert_eq!(visible_ids(&process_page), before);
}

#[rstest]
#[case::root("apache1", 1)]
#[case::mid("postgres1", 4)]
fn collapsing_hides_exactly_the_subtree(
    mut process_page: ProcessMapPage<CharSurface>,
    #[case] id: &str,
    #[case] remaining: usize,
) {
    let toggle = toggle_point(&process_page, id);
    process_page.on_pointer(PointerEvent::left(toggle));
    assert_eq!(visible_ids(&process_page).len(), remaining);
}

#[rstest]
fn clicking_a_leaf_selects_instead_of_toggling(mut process_page: ProcessMapPage<CharSurface>) {
    let leaf = process_page
        .diagram()
        .layout()
        .position(&nid("iis1"))
        .expect("position");

    let outcome = process_page.on_pointer(PointerEvent::left(leaf));
    assert_eq!(outcome, Outcome::Selected(nid("iis1")));
    assert_eq!(visible_ids(&process_page).len(), 6);
}

#[rstest]
fn detail_menu_reports_the_node_without_touching_the_model(
    mut main_page: MainGraphPage<CharSurface>,
) {
    let p = main_page
        .diagram()
        .layout()
        .position(&nid("servera"))
        .expect("position");

    assert_eq!(
        main_page.on_pointer(PointerEvent::right(p)),
        Outcome::MenuOpened
    );
    main_page.activate_menu(0);

    let detail = main_page.detail().expect("detail overlay");
    assert_eq!(detail.id, nid("servera"));
    assert_eq!(detail.label, "server-a.example.com");
    assert_eq!(detail.cluster.as_deref(), Some("default"));

    let graph = main_page
        .diagram()
        .model()
        .as_graph()
        .expect("graph model");
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.edges().len(), 2);
}

#[rstest]
fn process_map_menu_entry_requests_navigation(mut main_page: MainGraphPage<CharSurface>) {
    let p = main_page
        .diagram()
        .layout()
        .position(&nid("serverb"))
        .expect("position");

    main_page.on_pointer(PointerEvent::right(p));
    main_page.activate_menu(1);

    assert_eq!(
        main_page.take_navigation().map(|route| route.path()),
        Some("/processmap")
    );
}

#[rstest]
fn rejected_seed_data_leaves_the_frame_untouched(mut main_page: MainGraphPage<CharSurface>) {
    let frame = main_page.diagram().surface().canvas().to_string();

    let err = main_page
        .load_json(r#"{ "nodes": [{ "id": "a", "label": "A" }], "edges": [{ "source": "a", "target": "ghost" }] }"#)
        .unwrap_err();
    assert!(matches!(err, PageError::Model(_)));

    assert_eq!(main_page.diagram().surface().canvas().to_string(), frame);
    assert_eq!(main_page.diagram().scene().groups().len(), 3);
}

#[rstest]
fn resize_keeps_the_process_tree_intact(mut process_page: ProcessMapPage<CharSurface>) {
    process_page
        .diagram_mut()
        .surface_mut()
        .resize(200, 60)
        .expect("resize");
    process_page.on_resize();

    assert_eq!(visible_ids(&process_page).len(), 6);
    let frame = process_page.diagram().surface().canvas().to_string();
    assert!(frame.contains("PID: 3476"));
}
