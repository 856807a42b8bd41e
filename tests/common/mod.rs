#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cqload::{cli::actions::Action, pipeline::Selection};
use flate2::{Compression, write::GzEncoder};
use std::{
    fs,
    io::Write,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};
use tempfile::TempDir;
use wiremock::MockServer;

/// Two datasets: ds1 ("first", tagged adb) and ds2 ("second", tagged aok)
pub const CATALOG: &str = r#"{
    "ds2": {"name": "second", "label": "Second", "sources": ["aok"]},
    "ds1": {"name": "first", "label": "First", "weight": 10, "sources": ["adb"]}
}"#;

pub const TOKEN: &str = "secret";

pub fn gzip(content: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Temporary directory holding the dataset catalog and the artifact trees
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let workspace = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        workspace.write("datasets.json", CATALOG.as_bytes());
        workspace
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &[u8]) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write `count` chunks for a dataset
    pub fn chunks(&self, id: &str, count: usize) {
        for i in 0..count {
            self.write(&format!("cqpp/{id}/cqpp/table{i}.import.cqpp"), b"chunk");
        }
    }

    /// Write one artifact of every kind for both datasets
    pub fn populate(&self) {
        for id in ["ds1", "ds2"] {
            self.write(&format!("gen/{id}/mappings/plz.mapping.json"), b"{}");
            self.write(&format!("gen/{id}/secondaryIds/pid.import.json"), b"{}");
            self.write(&format!("gen/{id}/searchIndex/icd.filter.json"), b"{}");
            self.write(&format!("gen/{id}/tables/person.table.json"), b"{}");
            self.write(&format!("gen/{id}/concepts/icd.concept.json"), b"{}");
            self.write(&format!("gen/{id}/structure_{id}.json"), b"[]");
            self.write(&format!("gen/{id}/preview.json"), b"{}");
            self.write(
                &format!("decode/{id}/csv/decoding.2024.csv.gz"),
                &gzip("pid;extern\n"),
            );
            self.chunks(id, 2);
        }
    }

    /// Command line pointing at this workspace and `server`, followed by `extra`
    pub fn args(&self, server: &MockServer, extra: &[&str]) -> Vec<String> {
        let root = |relative: &str| self.path().join(relative).display().to_string();
        let mut args: Vec<String> = vec![
            "cqload".into(),
            "--datasets-file".into(),
            root("datasets.json"),
            "--cqpp".into(),
            root("cqpp"),
            "--decode".into(),
            root("decode"),
            "--json".into(),
            root("gen"),
            "--server".into(),
            server.uri(),
            "--delay".into(),
            "0".into(),
            "--token".into(),
            TOKEN.into(),
        ];
        args.extend(extra.iter().map(ToString::to_string));
        args
    }

    /// A load against `server` with every root directory set and no delay
    pub fn load(&self, server: &MockServer) -> Load {
        Load {
            datasets: Vec::new(),
            datasets_file: self.path().join("datasets.json"),
            selection: Selection::All,
            cqpp: Some(self.path().join("cqpp")),
            decode: Some(self.path().join("decode")),
            decode_source: None,
            json: self.path().join("gen"),
            parallelism: None,
            update: false,
            dry_run: false,
            api_url: format!("{}/admin", server.uri()),
        }
    }
}

/// Adjustable parameters of a load, see [`Workspace::load`]
pub struct Load {
    pub datasets: Vec<String>,
    pub datasets_file: PathBuf,
    pub selection: Selection,
    pub cqpp: Option<PathBuf>,
    pub decode: Option<PathBuf>,
    pub decode_source: Option<String>,
    pub json: PathBuf,
    pub parallelism: Option<NonZeroUsize>,
    pub update: bool,
    pub dry_run: bool,
    pub api_url: String,
}

impl Load {
    pub fn actions(mut self, names: &[&str]) -> Self {
        self.selection = Selection::Names(names.iter().map(ToString::to_string).collect());
        self
    }

    pub fn datasets(mut self, tokens: &[&str]) -> Self {
        self.datasets = tokens.iter().map(ToString::to_string).collect();
        self
    }

    pub fn action(self) -> Action {
        Action::Load {
            datasets: self.datasets,
            datasets_file: self.datasets_file,
            selection: self.selection,
            cqpp: self.cqpp,
            decode: self.decode,
            decode_source: self.decode_source,
            json: self.json,
            parallelism: self.parallelism,
            delay: Duration::ZERO,
            update: self.update,
            dry_run: self.dry_run,
            token: Some(TOKEN.to_string()),
            api_url: self.api_url,
        }
    }

    pub async fn execute(self) -> anyhow::Result<()> {
        self.action().execute().await
    }
}

/// Paths of every request the server received, in arrival order
pub async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}
