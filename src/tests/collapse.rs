use super::{
    select_store, toggle, visible_entries, CollapseStore, NativeCollapse, PrivateCollapse,
    NATIVE_COLLAPSED_KEY, PRIVATE_COLLAPSED_KEY,
};
use crate::config::Config;
use crate::markup::AllowListSanitizer;
use crate::notebook::{Cell, Notebook};
use crate::outline::OutlineBuilder;

fn notebook() -> Notebook {
    Notebook::new(vec![
        Cell::markdown("# One"),
        Cell::code("a = 1"),
        Cell::markdown("## One.One"),
        Cell::code("b = 2"),
        Cell::markdown("# Two"),
        Cell::code("c = 3"),
    ])
}

fn hidden(nb: &Notebook) -> Vec<bool> {
    nb.cells.iter().map(|c| c.hidden).collect()
}

#[test]
fn test_private_toggle_sets_and_deletes_flag() {
    let mut nb = notebook();
    let store = PrivateCollapse;
    let builder = OutlineBuilder::new(Config::default(), &AllowListSanitizer);

    assert!(toggle(&mut nb, &store, 0));
    assert!(nb.cells[0].metadata_flag(PRIVATE_COLLAPSED_KEY));
    let outline = builder.build(Some(&mut nb));
    assert!(outline[0].is_collapsed());
    assert!(hidden(&nb).iter().all(|h| !h), "cells stay visible");

    assert!(!toggle(&mut nb, &store, 0));
    assert!(!nb.cells[0].metadata.contains_key(PRIVATE_COLLAPSED_KEY));
    let outline = builder.build(Some(&mut nb));
    assert!(!outline[0].is_collapsed());
}

#[test]
fn test_native_toggle_hides_section_cells() {
    let mut nb = notebook();
    let store = NativeCollapse;

    assert!(toggle(&mut nb, &store, 0));
    assert!(nb.cells[0].metadata_flag(NATIVE_COLLAPSED_KEY));
    assert_eq!(hidden(&nb), [false, true, true, true, false, false]);

    assert!(!toggle(&mut nb, &store, 0));
    assert_eq!(hidden(&nb), [false; 6]);
}

#[test]
fn test_native_expand_keeps_nested_collapsed_section_hidden() {
    let mut nb = notebook();
    let store = NativeCollapse;

    toggle(&mut nb, &store, 2);
    assert_eq!(hidden(&nb), [false, false, false, true, false, false]);

    toggle(&mut nb, &store, 0);
    toggle(&mut nb, &store, 0);
    assert_eq!(hidden(&nb), [false, false, false, true, false, false]);
}

#[test]
fn test_native_restore_applies_persisted_flags() {
    let mut nb = notebook();
    nb.cells[4].set_metadata_flag(NATIVE_COLLAPSED_KEY, true);

    NativeCollapse.restore(&mut nb);
    assert_eq!(hidden(&nb), [false, false, false, false, false, true]);
}

#[test]
fn test_stores_read_their_own_key_only() {
    let mut cell = Cell::markdown("# A");
    cell.set_metadata_flag(NATIVE_COLLAPSED_KEY, true);
    assert!(NativeCollapse.is_collapsed(&cell));
    assert!(!PrivateCollapse.is_collapsed(&cell));
}

#[test]
fn test_select_store_follows_sync_setting() {
    let synced = Config {
        sync_collapse_state: true,
        ..Config::default()
    };
    assert_eq!(select_store(&synced).key(), NATIVE_COLLAPSED_KEY);
    assert_eq!(select_store(&Config::default()).key(), PRIVATE_COLLAPSED_KEY);
}

#[test]
fn test_visible_entries_fold_collapsed_sections() {
    let mut nb = notebook();
    nb.cells[0].set_metadata_flag(PRIVATE_COLLAPSED_KEY, true);
    let config = Config {
        show_code: true,
        ..Config::default()
    };
    let outline = OutlineBuilder::new(config, &AllowListSanitizer).build(Some(&mut nb));

    // One, a=1, One.One, b=2, Two, c=3
    assert_eq!(outline.len(), 6);
    assert_eq!(visible_entries(&outline), [0, 4, 5]);
}

#[test]
fn test_toggle_out_of_range_is_a_no_op() {
    let mut nb = notebook();
    assert!(!toggle(&mut nb, &PrivateCollapse, 42));
}
