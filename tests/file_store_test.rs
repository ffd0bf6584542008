use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

use tasktree::config::Settings;
use tasktree::domain::{EditOutcome, ListKey, Selection, DEFAULT_ORDER_COLUMN, EMPTY_TREE};
use tasktree::infrastructure::di::ServiceContainer;
use tasktree::infrastructure::file_store::{FileTaskSource, FileTreeStore, LISTS_DIR};
use tasktree::infrastructure::traits::{FileSystem, RealFileSystem, TaskSource, TreeStore};
use tasktree::util::testing;
use tempfile::TempDir;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn inbox() -> ListKey {
    ListKey::new("inbox").unwrap()
}

fn real_fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

#[test]
fn given_no_stored_tree_when_fetching_then_empty_tree() {
    let dir = TempDir::new().unwrap();
    let store = FileTreeStore::new(real_fs(), dir.path());
    let text = store
        .fetch_serialized_tree(&inbox(), &Selection::named("inbox"))
        .unwrap();
    assert_eq!(text, EMPTY_TREE);
}

#[test]
fn given_persist_without_sync_when_storing_then_tree_written_and_no_queue_entry() {
    let dir = TempDir::new().unwrap();
    let store = FileTreeStore::new(real_fs(), dir.path());

    store.persist(&inbox(), "[-1,1,2]", false).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(LISTS_DIR).join("inbox.tree")).unwrap(),
        "[-1,1,2]"
    );
    assert!(!store.queue_path().exists());
    assert_eq!(
        store
            .fetch_serialized_tree(&inbox(), &Selection::named("inbox"))
            .unwrap(),
        "[-1,1,2]"
    );
}

#[test]
fn given_persist_with_sync_when_storing_then_queue_entry_appended() {
    let dir = TempDir::new().unwrap();
    let store = FileTreeStore::new(real_fs(), dir.path());

    store.persist(&inbox(), "[-1,1]", true).unwrap();
    store.persist(&inbox(), "[-1,1,2]", true).unwrap();

    let queue = fs::read_to_string(store.queue_path()).unwrap();
    let lines: Vec<&str> = queue.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.ends_with("\tinbox")), "{queue}");
    assert_eq!(
        fs::read_to_string(store.tree_path(&inbox())).unwrap(),
        "[-1,1,2]"
    );
}

#[test]
fn given_id_file_when_fetching_matching_ids_then_file_order_kept() {
    let dir = TempDir::new().unwrap();
    let source = FileTaskSource::new(real_fs(), dir.path());
    let selection = Selection::named("today");
    fs::create_dir_all(dir.path().join(LISTS_DIR)).unwrap();
    fs::write(source.ids_path(&selection), "# due today\n5\n3\n\n8\n").unwrap();

    assert_eq!(source.fetch_matching_ids(&selection).unwrap(), vec![5, 3, 8]);
}

#[test]
fn given_missing_id_file_when_fetching_matching_ids_then_none() {
    let dir = TempDir::new().unwrap();
    let source = FileTaskSource::new(real_fs(), dir.path());
    assert!(source
        .fetch_matching_ids(&Selection::named("nothing"))
        .unwrap()
        .is_empty());
}

#[test]
fn given_invalid_id_line_when_fetching_matching_ids_then_invalid_data() {
    let dir = TempDir::new().unwrap();
    let source = FileTaskSource::new(real_fs(), dir.path());
    let selection = Selection::named("broken");
    fs::create_dir_all(dir.path().join(LISTS_DIR)).unwrap();
    fs::write(source.ids_path(&selection), "1\nfoo\n").unwrap();

    let err = source.fetch_matching_ids(&selection).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(err.to_string().contains(":2:"), "{err}");
}

#[test]
fn given_selection_escaping_lists_dir_when_fetching_matching_ids_then_invalid_input() {
    let dir = TempDir::new().unwrap();
    let lists = dir.path().join(LISTS_DIR);
    fs::create_dir_all(&lists).unwrap();
    fs::write(dir.path().join("outside.ids"), "1\n").unwrap();
    let source = FileTaskSource::new(real_fs(), dir.path());

    let err = source
        .fetch_matching_ids(&Selection::named("../outside"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn given_container_when_editing_list_then_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        base_dir: dir.path().to_path_buf(),
        order_column: DEFAULT_ORDER_COLUMN.to_string(),
    };
    let container = ServiceContainer::new(settings).unwrap();
    fs::write(dir.path().join(LISTS_DIR).join("inbox.ids"), "1\n2\n3\n").unwrap();

    let mut updater = container
        .open_list(inbox(), Selection::named("inbox"))
        .unwrap();
    assert_eq!(updater.serialized(), "[-1,1,2,3]");
    assert_eq!(updater.indent(2, 1).unwrap(), EditOutcome::Applied);

    let reopened = container
        .open_list(inbox(), Selection::named("inbox"))
        .unwrap();
    assert_eq!(reopened.serialized(), "[-1,[1,2],3]");
    assert_eq!(reopened.indent_for_task(2), 1);

    let queue = fs::read_to_string(dir.path().join("outbound.queue")).unwrap();
    assert_eq!(queue.lines().count(), 1);
}
