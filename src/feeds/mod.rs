pub mod live;
pub mod table_source;
pub mod weather;

pub use live::{rest_url, SnapshotSource, SnapshotSubscription};
pub use table_source::TableSource;
pub use weather::{fetch_current, CurrentWeather, WeatherCondition, WeatherIcon, WeatherSettings};

use crate::error::{FeedError, LoadError};
use crate::table::{ComparisonTable, OccupancyTable, TableLayout};

/// Reads and parses the historical table. A read failure is returned as is;
/// parsing never fails.
pub async fn load_table(
    source: &TableSource,
    layout: TableLayout,
    client: &reqwest::Client,
) -> Result<OccupancyTable, LoadError> {
    let text = source.fetch_text(client).await?;
    Ok(OccupancyTable::parse(&text, layout))
}

pub async fn load_comparison(
    source: &TableSource,
    client: &reqwest::Client,
) -> Result<ComparisonTable, FeedError> {
    let text = source.fetch_text(client).await?;
    Ok(ComparisonTable::parse(&text))
}
