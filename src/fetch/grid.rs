use super::session::FetchSession;
use super::source::{HttpTileSource, Probe, TileSource};
use super::{FetchConfig, FetchReport};
use crate::error::FetchError;
use crate::tile::TileCoordinate;
use crate::utils::files::ensure_directory;
use crate::utils::http::build_client;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a single probe means for the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeStep {
    /// Tile stored; continue down the column.
    TileFetched,
    /// Miss or duplicate below row 0; move to the next column.
    RowExhausted,
    /// Miss or duplicate at row 0; the grid is complete.
    GridExhausted,
}

/// Walks the tile grid of one remote image and stores every tile.
pub struct GridFetcher<S> {
    source: S,
    config: FetchConfig,
}

impl GridFetcher<HttpTileSource> {
    /// Fetcher backed by a real HTTP client.
    pub fn http(config: FetchConfig) -> Result<Self, FetchError> {
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self::new(HttpTileSource::new(client), config))
    }
}

impl<S: TileSource> GridFetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Fetch the whole grid.
    ///
    /// Each configured extension gets one full walk, but the next extension
    /// is only tried when the first tile (0, 0) was missing under the
    /// previous one. Reaching the row/column ceiling aborts the run.
    pub async fn run(&self) -> Result<FetchReport, FetchError> {
        ensure_directory(&self.config.dest).map_err(|source| FetchError::CreateDir {
            path: self.config.dest.clone(),
            source,
        })?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} tiles {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));

        let mut found = None;
        for &extension in &self.config.extensions {
            match self.walk(extension, &pb).await {
                Ok(Some(session)) => {
                    found = Some(session);
                    break;
                }
                Ok(None) => {
                    warn!(extension, "First tile missing, trying next extension");
                }
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
        }
        pb.finish_and_clear();

        let report = match found {
            Some(session) => FetchReport {
                base_url: self.config.base_url.clone(),
                dest: self.config.dest.clone(),
                extension: Some(session.extension.to_string()),
                tiles: session.written.len(),
                columns: session.columns(),
                rows: session.rows(),
                duplicates: session.duplicates.len(),
            },
            None => {
                warn!(base_url = %self.config.base_url, "No tiles found under any extension");
                FetchReport {
                    base_url: self.config.base_url.clone(),
                    dest: self.config.dest.clone(),
                    extension: None,
                    tiles: 0,
                    columns: 0,
                    rows: 0,
                    duplicates: 0,
                }
            }
        };

        info!(
            tiles = report.tiles,
            columns = report.columns,
            rows = report.rows,
            duplicates = report.duplicates,
            "Grid fetched"
        );
        Ok(report)
    }

    /// One complete walk under `extension`. `None` if (0, 0) was missing.
    async fn walk(
        &self,
        extension: &'static str,
        pb: &ProgressBar,
    ) -> Result<Option<FetchSession>, FetchError> {
        let max = self.config.max_row_col_count;
        let mut session = FetchSession::new(extension);
        let mut col = 0;

        'grid: loop {
            let mut row = 0;
            loop {
                session.position = TileCoordinate::new(col, row);
                match self.probe(&mut session, pb).await? {
                    ProbeStep::TileFetched => {
                        row += 1;
                        if row >= max {
                            return Err(FetchError::CeilingReached { max, col, row });
                        }
                    }
                    ProbeStep::RowExhausted => break,
                    ProbeStep::GridExhausted => break 'grid,
                }
            }

            col += 1;
            if col >= max {
                return Err(FetchError::CeilingReached { max, col, row });
            }
        }

        if session.written.is_empty() {
            Ok(None)
        } else {
            Ok(Some(session))
        }
    }

    async fn probe(
        &self,
        session: &mut FetchSession,
        pb: &ProgressBar,
    ) -> Result<ProbeStep, FetchError> {
        let coord = session.position;
        let boundary = if coord.row == 0 {
            ProbeStep::GridExhausted
        } else {
            ProbeStep::RowExhausted
        };

        let url = format!(
            "{}{}{}",
            self.config.base_url,
            coord.file_stem(),
            session.extension
        );
        pb.set_message(url.clone());
        debug!(%url, "Downloading");

        let bytes = match self.source.probe(&url).await {
            Probe::Found(bytes) => bytes,
            Probe::Missing(reason) => {
                info!(%url, %reason, "No tile");
                return Ok(boundary);
            }
        };

        let path = self.config.dest.join(coord.file_name());
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| FetchError::Write {
                path: path.clone(),
                source,
            })?;

        if !session.deduper.admit(&bytes) {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| FetchError::Remove {
                    path: path.clone(),
                    source,
                })?;
            warn!(%coord, %url, "Duplicate tile content, treating as end of column");
            session.duplicates.push(coord);
            return Ok(boundary);
        }

        debug!(path = %path.display(), "Saved tile");
        session.written.push(coord);
        pb.inc(1);
        Ok(ProbeStep::TileFetched)
    }
}
