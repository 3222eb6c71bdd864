use explorer_state::Paginator;

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("node-{i}")).collect()
}

#[test]
fn test_total_pages_rounds_up() {
    let p = Paginator::new(ids(150), 4, None);
    assert_eq!(p.total_pages(), 38);
    assert_eq!(p.page(), 0);
}

#[test]
fn test_set_page_clamps() {
    let mut p = Paginator::new(ids(150), 4, None);
    p.set_page(-5);
    assert_eq!(p.page(), 0);
    p.set_page(1000);
    assert_eq!(p.page(), 37);
    assert_eq!(p.page_items(), &ids(150)[148..150]);
}

#[test]
fn test_initial_page_contains_selection() {
    let p = Paginator::new(ids(150), 4, Some("node-9"));
    assert_eq!(p.page(), 2);
    assert!(p.page_items().iter().any(|id| id == "node-9"));
}

#[test]
fn test_unknown_selection_starts_at_first_page() {
    let p = Paginator::new(ids(10), 4, Some("nope"));
    assert_eq!(p.page(), 0);
    assert_eq!(p.selected(), Some("nope"));
}

#[test]
fn test_selection_change_jumps_to_page() {
    let mut p = Paginator::new(ids(150), 4, None);
    p.select(Some("node-101"));
    assert_eq!(p.page(), 25);
}

#[test]
fn test_empty_list() {
    let mut p: Paginator<String> = Paginator::new(Vec::new(), 4, None);
    assert_eq!(p.total_pages(), 0);
    p.set_page(3);
    assert_eq!(p.page(), 0);
    assert!(p.page_items().is_empty());
}

#[test]
fn test_shrinking_list_clamps_page() {
    let mut p = Paginator::new(ids(20), 4, None);
    p.set_page(4);
    p.set_items(ids(6));
    assert_eq!(p.page(), 1);
    assert_eq!(p.page_items().len(), 2);
}
