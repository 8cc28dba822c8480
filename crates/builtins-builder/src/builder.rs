//! Builtins generation pipeline

use std::path::{Path, PathBuf};

use abridged_core::{
    render_rust_source, BuiltinTable, CacheDocument, CertificateRecord, GeneratorConfig,
    IdentifierAllocator, OrderedTable, Provenance, TableBuilder,
};
use anyhow::Context;

/// Today's date as `YYYY-MM-DD` (UTC)
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Where the table entries come from
enum Source {
    Records(Vec<CertificateRecord>),
    Cache(PathBuf),
}

/// Builds the builtin table from a certificate feed or a cache document
pub struct BuiltinsBuilder {
    config: GeneratorConfig,
    source: Source,
    list_date: Option<String>,
    generation_date: Option<String>,
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GeneratedBuiltins {
    pub table: OrderedTable,
    pub binary: BuiltinTable,
    pub provenance: Provenance,
}

impl BuiltinsBuilder {
    /// Build from freshly loaded certificate records
    pub fn from_records(config: GeneratorConfig, records: Vec<CertificateRecord>) -> Self {
        Self {
            config,
            source: Source::Records(records),
            list_date: None,
            generation_date: None,
        }
    }

    /// Regenerate from a cache document; its dates take precedence
    pub fn from_cache(config: GeneratorConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            source: Source::Cache(path.into()),
            list_date: None,
            generation_date: None,
        }
    }

    /// Set the trust-store list version (defaults to today)
    pub fn list_date(mut self, date: impl Into<String>) -> Self {
        self.list_date = Some(date.into());
        self
    }

    /// Pin the generation date (defaults to today)
    pub fn generation_date(mut self, date: impl Into<String>) -> Self {
        self.generation_date = Some(date.into());
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce the ordered and flattened tables without touching the filesystem
    /// (except to read a cache source)
    pub fn generate(self) -> anyhow::Result<GeneratedBuiltins> {
        let algorithm = self.config.algorithm;

        let (table, list_date, generation_date, algorithm_name) = match self.source {
            Source::Records(records) => {
                tracing::info!(
                    records = records.len(),
                    algorithm = algorithm.as_str(),
                    prefix = self.config.prefix,
                    "Building table from certificate records"
                );
                let builder = TableBuilder::new(algorithm.engine());
                let mut allocator = IdentifierAllocator::new(self.config.prefix);
                let table = builder
                    .build(records, &mut allocator)
                    .context("failed to build builtin table")?;
                (
                    table,
                    self.list_date.unwrap_or_else(today),
                    self.generation_date.unwrap_or_else(today),
                    Some(algorithm.as_str().to_string()),
                )
            }
            Source::Cache(path) => {
                let doc = CacheDocument::load(&path)
                    .with_context(|| format!("failed to load cache {}", path.display()))?;
                // The cache holds digests only; the algorithm that produced
                // them is not recorded.
                (doc.table, doc.list_date, doc.creation_date, None)
            }
        };

        let binary = BuiltinTable::from_table(&table);
        let provenance = Provenance {
            generation_date,
            list_date,
            algorithm: algorithm_name,
        };

        tracing::info!(
            entries = binary.len(),
            bytes = binary.as_bytes().len(),
            list_date = %provenance.list_date,
            "Builtin table generated"
        );

        Ok(GeneratedBuiltins {
            table,
            binary,
            provenance,
        })
    }

    /// Generate and write every output named in the config
    pub fn build(self) -> anyhow::Result<GeneratedBuiltins> {
        let config = self.config.clone();
        let from_cache = matches!(self.source, Source::Cache(_));
        let generated = self.generate()?;

        generated.write_source(&config.output)?;

        if let Some(path) = &config.binary_output {
            generated
                .binary
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        // Regenerating from a cache never rewrites it
        if let (Some(path), false) = (&config.cache_output, from_cache) {
            generated
                .cache_document()
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        Ok(generated)
    }
}

impl GeneratedBuiltins {
    pub fn rust_source(&self) -> String {
        render_rust_source(&self.binary, &self.provenance)
    }

    pub fn cache_document(&self) -> CacheDocument {
        CacheDocument::new(
            self.table.clone(),
            self.provenance.list_date.clone(),
            self.provenance.generation_date.clone(),
        )
    }

    /// Write the generated Rust module atomically
    pub fn write_source(&self, path: &Path) -> anyhow::Result<()> {
        abridged_core::write_atomic(path, self.rust_source().as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Generated builtins source");
        Ok(())
    }
}
