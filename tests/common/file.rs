use derive_new::new;
use fake::Fake;
use fake::faker::lorem::en::Words;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: FileSpec) {
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }

    std::fs::write(&file_spec.path, file_spec.content).expect("Failed to write file");
}

/// A few random words, one per line
pub fn random_content() -> String {
    let words: Vec<String> = Words(3..8).fake();
    words.join("\n")
}
