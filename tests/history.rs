use crate::common::repository::{Sandbox, sandbox, test_config};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn log_lists_first_parent_history_newest_first(sandbox: Sandbox) {
    let first = sandbox.commit_files(&[("a.txt", "1")], "first");
    let second = sandbox.commit_files(&[("b.txt", "2")], "second");
    let third = sandbox.commit_files(&[("a.txt", "3")], "third\n\nwith a body");

    let log = sandbox.repository.log(None).unwrap();

    let oids = log.iter().map(|(oid, _)| oid.clone()).collect::<Vec<_>>();
    assert_eq!(oids, vec![third, second.clone(), first.clone()]);
    assert_eq!(log[0].1.short_message(), "third");
    assert_eq!(log[0].1.parent(), Some(&second));
    assert!(log[2].1.is_root());
    assert_eq!(log[0].1.author().name(), "Test Author");
}

#[rstest]
fn log_of_an_empty_branch_is_empty(sandbox: Sandbox) {
    assert!(sandbox.repository.log(None).unwrap().is_empty());

    sandbox.repository.create_branch("other", None).unwrap();
    assert!(sandbox.repository.log(Some("other")).unwrap().is_empty());
}

#[rstest]
fn commits_accumulate_trees(sandbox: Sandbox) {
    sandbox.commit_files(&[("a.txt", "1"), ("dir/b.txt", "2")], "first");
    let second = sandbox.commit_files(&[("dir/c.txt", "3")], "second");

    let paths = sandbox
        .tree_of(&second)
        .into_iter()
        .map(|(path, _)| path)
        .collect::<Vec<_>>();

    assert_eq!(paths, vec!["a.txt", "dir/b.txt", "dir/c.txt"]);
}

#[rstest]
fn removal_is_recorded_in_the_next_commit(sandbox: Sandbox) {
    sandbox.commit_files(&[("a.txt", "1"), ("b.txt", "2")], "first");

    sandbox.repository.remove("b.txt").unwrap();
    let second = sandbox.repository.commit("drop b").unwrap();

    assert!(!sandbox.dir.path().join("b.txt").exists());
    assert_eq!(
        sandbox.tree_of(&second).into_iter().map(|(path, _)| path).collect::<Vec<_>>(),
        vec!["a.txt"]
    );
}

#[rstest]
fn removing_an_untracked_file_fails(sandbox: Sandbox) {
    sandbox.write("loose.txt", "never added");

    let result = sandbox.repository.remove("loose.txt");

    assert!(matches!(result, Err(twig::Error::InvalidPath(_))));
}

#[rstest]
fn committing_without_staged_changes_fails(sandbox: Sandbox) {
    assert!(matches!(
        sandbox.repository.commit("empty"),
        Err(twig::Error::NothingToCommit)
    ));
}

#[rstest]
fn staging_inside_the_private_area_fails(sandbox: Sandbox) {
    let result = sandbox.repository.add(&[".twig/HEAD"]);

    assert!(matches!(result, Err(twig::Error::InvalidPath(_))));
}

#[rstest]
fn staging_a_path_with_a_carriage_return_fails(sandbox: Sandbox) {
    sandbox.write("f", "plain");
    sandbox.write("f\r", "shadow");

    let result = sandbox.repository.add(&["f\r"]);

    assert!(matches!(result, Err(twig::Error::InvalidPath(_))));
    let reopened = twig::Repository::open(sandbox.dir.path(), test_config()).unwrap();
    assert!(reopened.index().lock().is_empty());
}

#[rstest]
fn common_ancestor_of_forked_branches_is_the_fork_point(sandbox: Sandbox) {
    let base = sandbox.commit_files(&[("a.txt", "base")], "base");
    sandbox.repository.create_branch("feature", None).unwrap();
    let main_tip = sandbox.commit_files(&[("main.txt", "main")], "main work");
    sandbox.switch("feature");
    let feature_tip = sandbox.commit_files(&[("feature.txt", "feature")], "feature work");

    let history = sandbox.repository.history();

    assert_eq!(
        history.common_ancestor(&main_tip, &feature_tip).unwrap(),
        Some(base.clone())
    );
    assert!(history.is_ancestor(&base, &feature_tip).unwrap());
    assert!(!history.is_ancestor(&main_tip, &feature_tip).unwrap());
    assert_eq!(history.commits_between(&base, &feature_tip).unwrap(), vec![feature_tip]);
}

#[rstest]
fn ancestors_contain_every_parent(sandbox: Sandbox) {
    let commits = (0..5)
        .map(|n| sandbox.commit_files(&[("counter.txt", n.to_string().as_str())], &format!("commit {n}")))
        .collect::<Vec<_>>();

    let tip = commits.last().unwrap();
    let ancestry = sandbox.repository.history().ancestors(tip).unwrap();

    assert_eq!(ancestry.len(), commits.len());
    for oid in ancestry.iter() {
        let commit = sandbox.repository.database().load_commit(oid).unwrap();
        if let Some(parent) = commit.parent() {
            assert!(ancestry.contains(parent));
        }
    }
}
