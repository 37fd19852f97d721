//! End-to-end sessions over archives written to disk.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;
use vshell::{
    Archive, ArchiveFormat, CommandDispatcher, Flow, Outcome, ScriptRunner, Session, ShellError,
    ShellState,
};
use zip::write::SimpleFileOptions;

fn write_zip(dir: &Path, file_name: &str, with_directories: bool) -> PathBuf {
    let path = dir.join(file_name);
    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default();
    if with_directories {
        writer.add_directory("root/", options).unwrap();
        writer.add_directory("root/subDir1/", options).unwrap();
    }
    writer.start_file("root/subDir1/text1.txt", options).unwrap();
    writer.write_all(b"contents of text1").unwrap();
    writer.start_file("root/file.txt", options).unwrap();
    writer.write_all(b"contents of file").unwrap();
    writer.finish().unwrap();
    path
}

fn tar_bytes() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut append = |path: &str, entry_type: tar::EntryType, data: &[u8]| {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, data).unwrap();
    };
    append("root/", tar::EntryType::Directory, b"");
    append("root/subDir1/", tar::EntryType::Directory, b"");
    append("root/subDir1/text1.txt", tar::EntryType::Regular, b"contents of text1");
    append("root/file.txt", tar::EntryType::Regular, b"contents of file");
    builder.into_inner().unwrap()
}

async fn open(path: &Path) -> CommandDispatcher {
    let archive = Archive::open(path).await.unwrap();
    CommandDispatcher::new(ShellState::new(Session::from(archive)))
}

fn output(text: &str) -> Result<Outcome, ShellError> {
    Ok(Outcome::Output(text.to_string()))
}

fn assert_round_trip(shell: &mut CommandDispatcher) {
    assert_eq!(shell.dispatch("pwd"), output("root(root)"));
    assert_eq!(shell.dispatch("ls"), output("subDir1 file.txt"));
    assert_eq!(shell.dispatch("cd subDir1"), output("root/subDir1"));
    assert_eq!(shell.dispatch("cat text1.txt"), output("contents of text1"));
    assert_eq!(shell.dispatch("cd .."), output("root"));
    assert_eq!(shell.dispatch("cd .."), output("root"));
}

#[tokio::test]
async fn zip_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_zip(dir.path(), "root.zip", true);
    assert_round_trip(&mut open(&path).await);
}

#[tokio::test]
async fn zip_without_directory_records() {
    let dir = TempDir::new().unwrap();
    let path = write_zip(dir.path(), "root.zip", false);
    assert_round_trip(&mut open(&path).await);
}

#[tokio::test]
async fn tar_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("root.tar");
    std::fs::write(&path, tar_bytes()).unwrap();

    let archive = Archive::open(&path).await.unwrap();
    assert_eq!(archive.format, ArchiveFormat::Tar);
    assert_eq!(archive.root, "root");
    assert_round_trip(&mut open(&path).await);
}

#[tokio::test]
async fn gzipped_tar_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("root.tar.gz");
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(&tar_bytes()).unwrap();
    encoder.finish().unwrap();

    assert_round_trip(&mut open(&path).await);
}

#[tokio::test]
async fn root_follows_the_file_name() {
    let dir = TempDir::new().unwrap();
    let path = write_zip(dir.path(), "root.ZIP", true);
    let archive = Archive::open(&path).await.unwrap();
    assert_eq!(archive.root, "root");
    assert_eq!(archive.format, ArchiveFormat::Zip);
}

#[tokio::test]
async fn startup_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("root.zip");
    let err = Archive::open(&missing).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShellError>(),
        Some(&ShellError::ArchiveNotFound(missing.clone()))
    );

    let wrong = dir.path().join("root.7z");
    std::fs::write(&wrong, b"not handled").unwrap();
    let err = Archive::open(&wrong).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ShellError>(),
        Some(&ShellError::UnsupportedExtension(wrong.clone()))
    );

    let corrupt = dir.path().join("broken.zip");
    std::fs::write(&corrupt, b"definitely not a zip archive").unwrap();
    assert!(Archive::open(&corrupt).await.is_err());
}

#[tokio::test]
async fn ls_never_moves_the_cursor() {
    let dir = TempDir::new().unwrap();
    let mut shell = open(&write_zip(dir.path(), "root.zip", true)).await;

    for target in ["subDir1", "..", "missing", "file.txt", "a b", "a//b", "."] {
        let before = shell.state().cursor().cloned();
        let _ = shell.dispatch(&format!("ls {}", target));
        assert_eq!(shell.state().cursor().cloned(), before, "ls {}", target);
    }
    assert_eq!(shell.dispatch("ls subDir1"), output("text1.txt"));
}

#[tokio::test]
async fn cat_errors_never_print_content() {
    let dir = TempDir::new().unwrap();
    let mut shell = open(&write_zip(dir.path(), "root.zip", true)).await;

    assert_eq!(
        shell.dispatch("cat subDir1"),
        Err(ShellError::NotAFile("subDir1".into()))
    );
    assert_eq!(
        shell.dispatch("cat nothing.txt"),
        Err(ShellError::PathNotFound("nothing.txt".into()))
    );
}

#[tokio::test]
async fn script_then_state_carries_over() {
    let dir = TempDir::new().unwrap();
    let mut shell = open(&write_zip(dir.path(), "root.zip", true)).await;
    let script_path = dir.path().join("script.txt");
    std::fs::write(&script_path, "pwd\r\nbogus\r\ncd subDir1\r\ncat text1.txt\r\n").unwrap();

    let mut out = Vec::new();
    let flow = ScriptRunner::load(&script_path)
        .await
        .unwrap()
        .run(&mut shell, &mut out)
        .await
        .unwrap();

    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "root(root)\nERROR: bogus command does not exist\nroot/subDir1\ncontents of text1\n"
    );
    assert_eq!(shell.dispatch("pwd"), output("root/subDir1"));
}
