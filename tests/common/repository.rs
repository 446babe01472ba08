use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::fixture;
use twig::Repository;
use twig::artifacts::branch::branch_name::BranchName;
use twig::artifacts::core::config::Config;
use twig::artifacts::objects::object_id::ObjectId;

/// A freshly initialized repository in its own temporary directory
pub struct Sandbox {
    pub dir: TempDir,
    pub repository: Repository,
}

#[fixture]
pub fn sandbox() -> Sandbox {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repository = Repository::init(dir.path(), test_config()).expect("Failed to init");

    Sandbox { dir, repository }
}

pub fn test_config() -> Config {
    Config::default()
        .with_author("Test Author", "author@example.com")
        .expect("Failed to build config")
}

impl Sandbox {
    pub fn write(&self, path: &str, content: &str) {
        write_file(FileSpec::new(self.dir.path().join(path), content.to_string()));
    }

    /// Write, stage and commit the given files on the current branch
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) -> ObjectId {
        for (path, content) in files {
            self.write(path, content);
        }
        let paths = files.iter().map(|(path, _)| *path).collect::<Vec<_>>();
        self.repository.add(&paths).expect("Failed to stage files");

        self.repository.commit(message).expect("Failed to commit")
    }

    pub fn tip(&self, branch: &str) -> Option<ObjectId> {
        let name = BranchName::try_parse(branch).expect("Invalid branch name");
        self.repository.refs().read_branch(&name).expect("Failed to read branch")
    }

    pub fn switch(&self, branch: &str) {
        self.repository.switch(branch).expect("Failed to switch branch");
    }

    /// `(path, blob id)` pairs of a commit's tree, in path order
    pub fn tree_of(&self, commit: &ObjectId) -> Vec<(String, ObjectId)> {
        let commit = self.repository.database().load_commit(commit).expect("Missing commit");
        let tree = self
            .repository
            .database()
            .load_tree(commit.tree_oid())
            .expect("Missing tree");

        tree.entries()
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .collect()
    }
}
