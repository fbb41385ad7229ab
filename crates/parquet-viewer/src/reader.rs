//! Columnar file reader.
//!
//! [`ColumnarFile`] opens a Parquet or Arrow IPC file and exposes three
//! read-only views of it: the Arrow schema, file-level [`FileMetadata`], and
//! the rows as a sequence of [`RecordBatch`]es shaped by [`ScanOptions`].
//!
//! Every call reopens the file; a `ColumnarFile` holds no open handles.
//!
//! # Example
//!
//! ```rust,no_run
//! use parquet_viewer::{ColumnarFile, ScanOptions};
//!
//! let file = ColumnarFile::open("trades.parquet")?;
//! let batches = file.scan(&ScanOptions::new().with_batch_size(4).with_limit(7))?;
//! assert!(batches.iter().all(|b| b.num_rows() <= 4));
//! # Ok::<(), parquet_viewer::ViewerError>(())
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::ipc::reader::{FileReader, StreamReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use tracing::debug;

use crate::config::ReaderConfig;
use crate::error::{Result, ViewerError};
use crate::format::FileFormat;
use crate::rebatch::Rebatcher;

/// `created_by` reported for Arrow IPC inputs, which carry no writer tag.
pub const ARROW_IPC_CREATED_BY: &str = "Arrow IPC";

type DecodedBatches = Box<dyn Iterator<Item = std::result::Result<RecordBatch, ArrowError>>>;

/// File-level statistics and annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Size of the file on disk, in bytes.
    pub file_size: u64,
    /// Total number of rows.
    pub total_records: i64,
    /// Number of top-level fields; always equals the schema width.
    pub total_fields: usize,
    /// Parquet row groups, or IPC record batches for Arrow inputs.
    pub total_row_groups: usize,
    /// Parquet format version; `0` for Arrow inputs.
    pub version: i32,
    /// Writer annotation, when present.
    pub created_by: Option<String>,
    /// User key/value metadata. Empty when the file has none.
    pub key_value_metadata: Vec<(String, String)>,
}

/// Shape of a row scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Rows per output batch (`None` or `0` = config default).
    pub batch_size: Option<usize>,
    /// Maximum rows overall (`None` or `0` = unbounded).
    pub limit: Option<usize>,
    /// Column positions to emit, in output order. Repeats are allowed.
    pub projection: Option<Vec<usize>>,
}

impl ScanOptions {
    /// Full scan with default batching.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch size. `0` selects the default.
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = (size > 0).then_some(size);
        self
    }

    /// Sets the row limit. `0` means unbounded.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Sets the projected columns.
    #[must_use]
    pub fn with_projection(mut self, indices: Vec<usize>) -> Self {
        self.projection = Some(indices);
        self
    }
}

/// A Parquet or Arrow IPC file on the local filesystem.
#[derive(Debug, Clone)]
pub struct ColumnarFile {
    path: PathBuf,
    format: FileFormat,
    config: ReaderConfig,
}

impl ColumnarFile {
    /// Open `path` with the default [`ReaderConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FileNotFound`] for a missing path, and the
    /// errors of [`FileFormat::detect`] otherwise.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open `path` with an explicit config.
    ///
    /// # Errors
    ///
    /// Same as [`ColumnarFile::open`].
    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ViewerError::FileNotFound(path.display().to_string()));
        }

        let format = FileFormat::detect(path)?;
        debug!(path = %path.display(), format = format.name(), "opened columnar file");

        Ok(Self {
            path: path.to_path_buf(),
            format,
            config,
        })
    }

    /// Path this file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected format.
    #[must_use]
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Config used for scans.
    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Logical Arrow schema, in column order.
    ///
    /// For Parquet only the footer is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its schema cannot be
    /// resolved.
    pub fn schema(&self) -> Result<SchemaRef> {
        match self.format {
            FileFormat::Parquet => Ok(self.parquet_builder()?.schema().clone()),
            FileFormat::ArrowFile => Ok(self.arrow_file_reader()?.schema()),
            FileFormat::ArrowStream => Ok(self.arrow_stream_reader()?.schema()),
        }
    }

    /// File-level statistics.
    ///
    /// Parquet answers from the footer. Arrow IPC has no row count in its
    /// footer, so its batches are decoded and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded.
    pub fn metadata(&self) -> Result<FileMetadata> {
        let file_size = std::fs::metadata(&self.path)?.len();

        match self.format {
            FileFormat::Parquet => {
                let builder = self.parquet_builder()?;
                let total_fields = builder.schema().fields().len();
                let meta = builder.metadata();
                let file_meta = meta.file_metadata();

                let key_value_metadata = file_meta
                    .key_value_metadata()
                    .map(|pairs| {
                        pairs
                            .iter()
                            .map(|kv| (kv.key.clone(), kv.value.clone().unwrap_or_default()))
                            .collect()
                    })
                    .unwrap_or_default();

                Ok(FileMetadata {
                    file_size,
                    total_records: file_meta.num_rows(),
                    total_fields,
                    total_row_groups: meta.num_row_groups(),
                    version: file_meta.version(),
                    created_by: file_meta.created_by().map(str::to_owned),
                    key_value_metadata,
                })
            }
            FileFormat::ArrowFile => {
                let reader = self.arrow_file_reader()?;
                let schema = reader.schema();
                ipc_metadata(file_size, &schema, Box::new(reader))
            }
            FileFormat::ArrowStream => {
                let reader = self.arrow_stream_reader()?;
                let schema = reader.schema();
                ipc_metadata(file_size, &schema, Box::new(reader))
            }
        }
    }

    /// Read rows in file order.
    ///
    /// Every returned batch has exactly the effective batch size, except the
    /// last, which may be shorter. At most `limit` rows are returned and
    /// decoding stops once the limit is reached. Projection indices are
    /// checked before any row is decoded.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ColumnOutOfRange`] or
    /// [`ViewerError::InvalidProjection`] for a bad projection, or any decode
    /// error. No partial result is returned.
    pub fn scan(&self, options: &ScanOptions) -> Result<Vec<RecordBatch>> {
        let batch_size = self.config.effective_batch_size(options.batch_size);
        let limit = options.limit.filter(|&n| n > 0);
        let projection = options.projection.as_deref();

        let (decoded, selection) = match self.format {
            FileFormat::Parquet => self.parquet_batches(projection, batch_size, limit)?,
            FileFormat::ArrowFile => {
                let reader = self.arrow_file_reader()?;
                let selection = ipc_selection(&reader.schema(), projection)?;
                (Box::new(reader) as DecodedBatches, selection)
            }
            FileFormat::ArrowStream => {
                let reader = self.arrow_stream_reader()?;
                let selection = ipc_selection(&reader.schema(), projection)?;
                (Box::new(reader) as DecodedBatches, selection)
            }
        };

        let mut rebatcher = Rebatcher::new(batch_size, limit);
        for batch in decoded {
            let batch = batch?;
            let batch = match &selection {
                Some(columns) => batch.project(columns)?,
                None => batch,
            };
            if rebatcher.push(batch)? {
                break;
            }
        }

        let batches = rebatcher.finish()?;
        debug!(
            path = %self.path.display(),
            batches = batches.len(),
            rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
            batch_size,
            "scan complete"
        );
        Ok(batches)
    }

    /// Parquet decoder with projection pushdown. The returned selection maps
    /// the pushed-down (file-ordered, distinct) columns to the requested order.
    fn parquet_batches(
        &self,
        projection: Option<&[usize]>,
        batch_size: usize,
        limit: Option<usize>,
    ) -> Result<(DecodedBatches, Option<Vec<usize>>)> {
        let mut builder = self.parquet_builder()?.with_batch_size(batch_size);

        let selection = match projection {
            Some(indices) => {
                validate_projection(indices, builder.schema().fields().len())?;

                let mut roots = indices.to_vec();
                roots.sort_unstable();
                roots.dedup();

                let mask = ProjectionMask::roots(builder.parquet_schema(), roots.iter().copied());
                builder = builder.with_projection(mask);

                Some(
                    indices
                        .iter()
                        .map(|i| roots.partition_point(|r| r < i))
                        .collect(),
                )
            }
            None => None,
        };

        if let Some(limit) = limit {
            builder = builder.with_limit(limit);
        }

        Ok((Box::new(builder.build()?), selection))
    }

    fn parquet_builder(&self) -> Result<ParquetRecordBatchReaderBuilder<File>> {
        let file = File::open(&self.path)?;
        Ok(ParquetRecordBatchReaderBuilder::try_new(file)?)
    }

    fn arrow_file_reader(&self) -> Result<FileReader<BufReader<File>>> {
        let file = BufReader::new(File::open(&self.path)?);
        Ok(FileReader::try_new(file, None)?)
    }

    fn arrow_stream_reader(&self) -> Result<StreamReader<BufReader<File>>> {
        let file = BufReader::new(File::open(&self.path)?);
        Ok(StreamReader::try_new(file, None)?)
    }
}

fn validate_projection(indices: &[usize], num_fields: usize) -> Result<()> {
    if indices.is_empty() {
        return Err(ViewerError::InvalidProjection(
            "projection must name at least one column".to_string(),
        ));
    }
    if let Some(&index) = indices.iter().find(|&&i| i >= num_fields) {
        return Err(ViewerError::ColumnOutOfRange { index, num_fields });
    }
    Ok(())
}

fn ipc_selection(schema: &Schema, projection: Option<&[usize]>) -> Result<Option<Vec<usize>>> {
    match projection {
        Some(indices) => {
            validate_projection(indices, schema.fields().len())?;
            Ok(Some(indices.to_vec()))
        }
        None => Ok(None),
    }
}

fn ipc_metadata(file_size: u64, schema: &Schema, batches: DecodedBatches) -> Result<FileMetadata> {
    let mut rows = 0usize;
    let mut count = 0usize;
    for batch in batches {
        rows += batch?.num_rows();
        count += 1;
    }

    // IPC schema metadata is an unordered map; sort for a stable order.
    let mut key_value_metadata: Vec<(String, String)> = schema
        .metadata()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    key_value_metadata.sort();

    Ok(FileMetadata {
        file_size,
        total_records: i64::try_from(rows).unwrap_or(i64::MAX),
        total_fields: schema.fields().len(),
        total_row_groups: count,
        version: 0,
        created_by: Some(ARROW_IPC_CREATED_BY.to_string()),
        key_value_metadata,
    })
}

/// Schema of the file at `path`.
///
/// # Errors
///
/// See [`ColumnarFile::open`] and [`ColumnarFile::schema`].
pub fn read_schema(path: &Path) -> Result<SchemaRef> {
    ColumnarFile::open(path)?.schema()
}

/// Metadata of the file at `path`.
///
/// # Errors
///
/// See [`ColumnarFile::open`] and [`ColumnarFile::metadata`].
pub fn read_metadata(path: &Path) -> Result<FileMetadata> {
    ColumnarFile::open(path)?.metadata()
}

/// All columns of the file at `path`, batched and limited.
///
/// # Errors
///
/// See [`ColumnarFile::open`] and [`ColumnarFile::scan`].
pub fn read_data(
    path: &Path,
    batch_size: Option<usize>,
    limit: Option<usize>,
) -> Result<Vec<RecordBatch>> {
    let options = ScanOptions {
        batch_size,
        limit,
        projection: None,
    };
    ColumnarFile::open(path)?.scan(&options)
}

/// Selected columns of the file at `path`, batched and limited.
///
/// # Errors
///
/// See [`ColumnarFile::open`] and [`ColumnarFile::scan`].
pub fn read_data_with_projection(
    path: &Path,
    column_indices: &[usize],
    batch_size: Option<usize>,
    limit: Option<usize>,
) -> Result<Vec<RecordBatch>> {
    let options = ScanOptions {
        batch_size,
        limit,
        projection: Some(column_indices.to_vec()),
    };
    ColumnarFile::open(path)?.scan(&options)
}
