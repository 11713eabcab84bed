use super::*;
use crate::{
    common::*,
    label::{LabelResolver, LabelTable},
};

/// The skeleton files found under a directory tree.
///
/// Every regular, non-hidden file is a record. Paths are visited in sorted
/// order, so token labels get the same ids on every load.
#[derive(Debug, Clone)]
pub struct SkeletonDataset {
    root: PathBuf,
    resolver: LabelResolver,
    records: Vec<Arc<FileRecord>>,
    num_classes: usize,
}

impl SkeletonDataset {
    pub async fn load(root: impl AsRef<Path>, resolver: LabelResolver) -> Result<Self> {
        let root = root.as_ref().to_owned();
        tokio::task::spawn_blocking(move || Self::scan(root, resolver)).await?
    }

    fn scan(root: PathBuf, mut resolver: LabelResolver) -> Result<Self> {
        ensure!(
            root.is_dir(),
            "the dataset directory '{}' does not exist",
            root.display()
        );

        let paths = list_files(&root)?;
        let records: Vec<_> = paths
            .into_iter()
            .map(|path| -> Result<_> {
                let label = resolver.resolve(&path)?;
                Ok(Arc::new(FileRecord { path, label }))
            })
            .collect::<Result<_>>()
            .with_context(|| format!("failed to label records in '{}'", root.display()))?;
        ensure!(
            !records.is_empty(),
            "no skeleton files found in '{}'",
            root.display()
        );

        let num_classes = match resolver.label_table() {
            Some(table) => table.len(),
            None => records
                .iter()
                .map(|record| record.label + 1)
                .max()
                .unwrap_or(0),
        };

        info!(
            "found {} records of {} classes in '{}'",
            records.len(),
            num_classes,
            root.display()
        );

        Ok(Self {
            root,
            resolver,
            records,
            num_classes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &LabelResolver {
        &self.resolver
    }
}

impl GenericDataset for SkeletonDataset {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn label_table(&self) -> Option<&LabelTable> {
        self.resolver.label_table()
    }
}

impl FileDataset for SkeletonDataset {
    fn records(&self) -> &[Arc<FileRecord>] {
        &self.records
    }
}

/// Lists the regular files under `root` recursively in sorted order, skipping hidden files.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let root_str = root
        .to_str()
        .ok_or_else(|| format_err!("non UTF-8 path '{}'", root.display()))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(root_str));

    let mut paths = vec![];
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }

        let is_hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with('.'))
            .unwrap_or(false);
        if is_hidden {
            debug!("skip hidden file '{}'", path.display());
            continue;
        }

        paths.push(path);
    }
    paths.sort();

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "0 0 0\n").unwrap();
    }

    #[tokio::test]
    async fn token_labels_follow_sorted_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        touch(&root.join("s02/walk_s02_e01.txt"));
        touch(&root.join("s01/walk_s01_e01.txt"));
        touch(&root.join("s01/carry_s01_e01.txt"));
        touch(&root.join("s01/.DS_Store"));

        let dataset = SkeletonDataset::load(root, LabelResolver::Token(LabelTable::new())).await?;
        let labels: Vec<_> = dataset
            .records()
            .iter()
            .map(|record| {
                let name = record.path.file_name().unwrap().to_str().unwrap();
                (name.to_owned(), record.label)
            })
            .collect();

        assert_eq!(
            labels,
            [
                ("carry_s01_e01.txt".to_owned(), 0),
                ("walk_s01_e01.txt".to_owned(), 1),
                ("walk_s02_e01.txt".to_owned(), 1),
            ]
        );
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(
            dataset.label_table().unwrap().names().collect::<Vec<_>>(),
            ["carry", "walk"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn action_codes_define_classes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        touch(&root.join("S001C001P001R001A003.npy"));
        touch(&root.join("S001C001P001R001A010.npy"));

        let dataset = SkeletonDataset::load(root, LabelResolver::ActionCode).await?;
        assert_eq!(dataset.records().len(), 2);
        assert_eq!(dataset.num_classes(), 10);
        assert!(dataset.label_table().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn load_fails_on_missing_or_empty_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let resolver = LabelResolver::ActionCode;

        assert!(SkeletonDataset::load(dir.path(), resolver.clone())
            .await
            .is_err());
        assert!(SkeletonDataset::load(dir.path().join("missing"), resolver)
            .await
            .is_err());
        Ok(())
    }

    #[tokio::test]
    async fn load_fails_on_unlabeled_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        touch(&dir.path().join("readme.txt"));

        let result = SkeletonDataset::load(dir.path(), LabelResolver::ActionCode).await;
        assert!(result.is_err());
        Ok(())
    }
}
