use crate::traits::CorpusSource;
use crate::{Corpus, CorpusEntry, CorpusError, CorpusKey};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalRecord {
    Entry(CorpusEntry),
    Name {
        name: String,
        #[serde(default)]
        url: Option<String>,
    },
}

pub struct LocalJsonSource {
    root: PathBuf,
}

impl LocalJsonSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn keys(&self) -> Vec<CorpusKey> {
        let mut keys: Vec<CorpusKey> = discover_corpus_files(&self.root)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        keys.dedup();
        keys
    }
}

#[async_trait]
impl CorpusSource for LocalJsonSource {
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
        let (_, path) = discover_corpus_files(&self.root)
            .into_iter()
            .find(|(found, _)| found == key)
            .ok_or_else(|| CorpusError::UnknownCorpus(key.to_string()))?;

        let raw = tokio::fs::read_to_string(&path).await?;
        let entries = parse_records(&raw)?;
        Ok(Corpus::new(key.clone(), entries))
    }
}

pub fn discover_corpus_files(folder: &Path) -> Vec<(CorpusKey, PathBuf)> {
    let mut found: Vec<(CorpusKey, PathBuf)> = WalkDir::new(folder)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| corpus_file_key(entry.path()).map(|key| (key, entry.into_path())))
        .collect();
    found.sort();
    found
}

fn corpus_file_key(path: &Path) -> Option<CorpusKey> {
    let is_json = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return None;
    }
    path.file_stem().and_then(OsStr::to_str).map(CorpusKey::new)
}

pub fn parse_records(raw: &str) -> Result<Vec<CorpusEntry>, CorpusError> {
    let records: Vec<LocalRecord> = serde_json::from_str(raw)?;

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| match record {
            LocalRecord::Entry(entry) => entry,
            LocalRecord::Name { name, url } => CorpusEntry {
                link: url,
                ..CorpusEntry::new((index + 1).to_string(), name)
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovery_is_recursive_and_json_only() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let nested = dir.path().join("urdu");
        fs::create_dir(&nested)?;
        fs::write(dir.path().join("sahaba-english.json"), "[]")?;
        fs::write(nested.join("sahaba-urdu.json"), "[]")?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;

        let keys: Vec<_> = discover_corpus_files(dir.path())
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec![CorpusKey::new("sahaba-english"), CorpusKey::new("sahaba-urdu")]
        );
        Ok(())
    }

    #[test]
    fn name_records_become_linked_entries() -> Result<(), Box<dyn std::error::Error>> {
        let entries = parse_records(
            r#"[
                {"name": "Abu Bakr `Abdullah ibn Abi Quhafa", "url": "https://en.wikipedia.org/wiki/Abu_Bakr"},
                {"id": "ali", "text": "Ali ibn Abi Talib"}
            ]"#,
        )?;

        assert_eq!(entries[0].id, "1");
        assert_eq!(entries[0].link.as_deref(), Some("https://en.wikipedia.org/wiki/Abu_Bakr"));
        assert_eq!(entries[1].id, "ali");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_reads_file_by_stem() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("sahaba-english.json"),
            r#"[{"name": "Ali ibn Abi Talib"}, {"name": "Aqeel ibn Abi Talib"}]"#,
        )?;
        let source = LocalJsonSource::new(dir.path());

        let corpus = source.fetch(&CorpusKey::new("sahaba-english")).await?;
        assert_eq!(corpus.len(), 2);
        assert_eq!(source.keys(), vec![CorpusKey::new("sahaba-english")]);

        let missing = source.fetch(&CorpusKey::new("sahaba-urdu")).await;
        assert!(matches!(missing, Err(CorpusError::UnknownCorpus(_))));
        Ok(())
    }
}
