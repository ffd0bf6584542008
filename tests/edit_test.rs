use rstest::rstest;
use tasktree::domain::{EditOutcome, OrderedTree, RejectReason, ROOT_TASK_ID};
use tasktree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const SAMPLE: &str = "[-1,[1,2,[3,4]],5,6]";

fn sample() -> OrderedTree {
    OrderedTree::from_serialized(SAMPLE)
}

#[test]
fn given_task_with_previous_sibling_when_indenting_then_last_child_of_sibling() {
    let mut tree = sample();
    assert_eq!(tree.indent(5, 1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,[3,4],5],6]");
    assert_eq!(tree.indent_of(5), Some(1));
    tree.validate().unwrap();
}

#[test]
fn given_large_delta_when_indenting_then_one_level_only() {
    let mut tree = sample();
    assert_eq!(tree.indent(6, 5), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,[3,4]],[5,6]]");
}

#[test]
fn given_subtree_when_indenting_then_descendant_indents_follow() {
    let mut tree = OrderedTree::from_serialized("[-1,1,[2,3]]");
    assert_eq!(tree.indent(2, 1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,[2,3]]]");
    assert_eq!(tree.indent_of(3), Some(2));
}

#[test]
fn given_nested_task_when_outdenting_then_follows_former_parent() {
    let mut tree = sample();
    assert_eq!(tree.indent(2, -1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,[3,4]],2,5,6]");

    let mut tree = sample();
    assert_eq!(tree.indent(4, -1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,3,4],5,6]");
    tree.validate().unwrap();
}

#[rstest]
#[case(1, 1, EditOutcome::Rejected(RejectReason::FirstChild))]
#[case(2, 1, EditOutcome::Rejected(RejectReason::FirstChild))]
#[case(5, -1, EditOutcome::Rejected(RejectReason::TopLevel))]
#[case(5, 0, EditOutcome::Rejected(RejectReason::ZeroDelta))]
#[case(42, 1, EditOutcome::NotFound)]
fn given_impossible_indent_when_indenting_then_tree_unchanged(
    #[case] task_id: i64,
    #[case] delta: i32,
    #[case] expected: EditOutcome,
) {
    let mut tree = sample();
    assert_eq!(tree.indent(task_id, delta), expected);
    assert_eq!(tree.serialize(), SAMPLE);
}

#[test]
fn given_target_in_other_parent_when_moving_then_adopts_target_parent() {
    let mut tree = sample();
    assert_eq!(tree.move_to(6, 3), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,6,[3,4]],5]");
    assert_eq!(tree.indent_of(6), Some(1));
}

#[test]
fn given_subtree_when_moving_then_children_travel_along() {
    let mut tree = sample();
    assert_eq!(tree.move_to(3, 1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[3,4],[1,2],5,6]");
    assert_eq!(tree.indent_of(4), Some(1));
    tree.validate().unwrap();
}

#[rstest]
#[case(5, 1, "[-1,5,[1,2,[3,4]],6]")]
#[case(1, 6, "[-1,5,[1,2,[3,4]],6]")]
#[case(1, 5, "[-1,[1,2,[3,4]],5,6]")]
fn given_same_sibling_list_when_moving_then_lands_directly_before_target(
    #[case] task_id: i64,
    #[case] before_id: i64,
    #[case] expected: &str,
) {
    let mut tree = sample();
    assert_eq!(tree.move_to(task_id, before_id), EditOutcome::Applied);
    assert_eq!(tree.serialize(), expected);
}

#[test]
fn given_sentinel_target_when_moving_then_appended_to_top_level() {
    let mut tree = sample();
    assert_eq!(tree.move_to(3, ROOT_TASK_ID), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2],5,6,[3,4]]");
    assert_eq!(tree.indent_of(4), Some(1));
}

#[rstest]
#[case(1, 4, EditOutcome::Rejected(RejectReason::WouldCycle))]
#[case(3, 3, EditOutcome::Rejected(RejectReason::WouldCycle))]
#[case(42, 1, EditOutcome::NotFound)]
#[case(1, 42, EditOutcome::NotFound)]
fn given_invalid_move_when_moving_then_tree_unchanged(
    #[case] task_id: i64,
    #[case] before_id: i64,
    #[case] expected: EditOutcome,
) {
    let mut tree = sample();
    assert_eq!(tree.move_to(task_id, before_id), expected);
    assert_eq!(tree.serialize(), SAMPLE);
}

#[test]
fn given_reference_when_moving_to_parent_of_then_last_sibling_of_reference() {
    let mut tree = sample();
    assert_eq!(tree.move_to_parent_of(6, 2), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,[3,4],6],5]");

    let mut tree = sample();
    assert_eq!(tree.move_to_parent_of(4, 5), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,3],5,6,4]");
    tree.validate().unwrap();
}

#[rstest]
#[case(1, 4, EditOutcome::Rejected(RejectReason::WouldCycle))]
#[case(42, 2, EditOutcome::NotFound)]
#[case(2, 42, EditOutcome::NotFound)]
fn given_invalid_reference_when_moving_to_parent_of_then_tree_unchanged(
    #[case] task_id: i64,
    #[case] reference_id: i64,
    #[case] expected: EditOutcome,
) {
    let mut tree = sample();
    assert_eq!(tree.move_to_parent_of(task_id, reference_id), expected);
    assert_eq!(tree.serialize(), SAMPLE);
}

#[test]
fn given_new_task_when_created_then_appended_at_top_level_end() {
    let mut tree = sample();
    assert_eq!(tree.on_create_task(7), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,[1,2,[3,4]],5,6,7]");
    assert_eq!(tree.indent_of(7), Some(0));
}

#[rstest]
#[case(4, EditOutcome::Rejected(RejectReason::AlreadyPresent))]
#[case(-1, EditOutcome::Rejected(RejectReason::InvalidId))]
#[case(-5, EditOutcome::Rejected(RejectReason::InvalidId))]
fn given_known_or_negative_id_when_created_then_rejected(
    #[case] task_id: i64,
    #[case] expected: EditOutcome,
) {
    let mut tree = sample();
    assert_eq!(tree.on_create_task(task_id), expected);
    assert_eq!(tree.serialize(), SAMPLE);
}

#[test]
fn given_parent_when_deleted_then_children_take_its_place() {
    let mut tree = sample();
    assert_eq!(tree.on_delete_task(1), EditOutcome::Applied);
    assert_eq!(tree.serialize(), "[-1,2,[3,4],5,6]");
    assert_eq!(tree.indent_of(2), Some(0));
    assert_eq!(tree.indent_of(4), Some(1));
    tree.validate().unwrap();
}

#[test]
fn given_unknown_task_when_deleted_then_not_found() {
    let mut tree = sample();
    assert_eq!(tree.on_delete_task(42), EditOutcome::NotFound);
    assert_eq!(tree.on_delete_task(ROOT_TASK_ID), EditOutcome::NotFound);
    assert_eq!(tree.serialize(), SAMPLE);
}

#[test]
fn given_edit_sequence_when_applied_then_tree_stays_consistent() {
    let mut tree = sample();
    tree.indent(5, 1);
    tree.indent(6, 1);
    tree.move_to(1, ROOT_TASK_ID);
    tree.on_create_task(9);
    tree.move_to_parent_of(9, 4);
    tree.on_delete_task(3);
    tree.validate().unwrap();
    assert_eq!(tree.serialize(), "[-1,[1,2,4,9,5,6]]");
}
