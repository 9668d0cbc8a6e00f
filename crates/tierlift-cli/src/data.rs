//! Historical population table (CSV).

use std::{io, path::Path};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tierlift_advisor::Assessment;
use tierlift_core::{FeatureVector, Tier, TierParsing};
use tierlift_training::population::HistoricalRecord;
use uuid::Uuid;

use crate::util::Output;

/// `Date` column format.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `Player_Name` of submissions without a username.
const GUEST_NAME: &str = "Guest";

/// One row of the historical table. Stat cells may be blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationRow {
    #[serde(rename = "Player_ID", default)]
    pub player_id: Option<String>,
    #[serde(rename = "Player_Name", default)]
    pub player_name: Option<String>,
    #[serde(rename = "K/D_Ratio")]
    pub kd_ratio: Option<f64>,
    #[serde(rename = "Avg_Damage")]
    pub avg_damage: Option<f64>,
    #[serde(rename = "Survival_Time")]
    pub survival_time: Option<f64>,
    #[serde(rename = "Tier")]
    pub tier: String,
    #[serde(rename = "Win_Rate (%)")]
    pub win_rate: Option<f64>,
    #[serde(rename = "Headshot_Rate (%)")]
    pub headshot_rate: Option<f64>,
    #[serde(rename = "Drills", default)]
    pub drills: Option<String>,
    #[serde(rename = "Opinions", default)]
    pub opinions: Option<String>,
    /// `1` when ready, `0` when not, blank when unlabeled
    #[serde(rename = "Promotion_Ready", default)]
    pub promotion_ready: Option<u8>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    /// Tier-progress columns, carried through unchanged
    #[serde(rename = "Season", default)]
    pub season: Option<String>,
    #[serde(rename = "Tier_Stage", default)]
    pub tier_stage: Option<u8>,
    #[serde(rename = "Tier_Points", default)]
    pub tier_points: Option<u8>,
}

impl PopulationRow {
    /// The five stats, if none of them is blank.
    pub fn features(&self) -> Option<FeatureVector> {
        Some(FeatureVector {
            kd_ratio: self.kd_ratio?,
            avg_damage: self.avg_damage?,
            avg_survival_time: self.survival_time?,
            win_ratio: self.win_rate?,
            headshot_percentage: self.headshot_rate?,
        })
    }

    /// The row recording one assessed submission under a fresh id.
    pub fn from_assessment(assessment: &Assessment, submitted_at: DateTime<Utc>) -> Self {
        let stats = &assessment.stats;
        Self {
            player_id: Some(Uuid::new_v4().to_string()),
            player_name: Some(
                assessment
                    .username
                    .clone()
                    .unwrap_or_else(|| GUEST_NAME.to_owned()),
            ),
            kd_ratio: Some(stats.kd_ratio),
            avg_damage: Some(stats.avg_damage),
            survival_time: Some(stats.avg_survival_time),
            tier: assessment.tier.to_string(),
            win_rate: Some(stats.win_ratio),
            headshot_rate: Some(stats.headshot_percentage),
            drills: Some(assessment.drills.join(", ")),
            opinions: Some(assessment.tips.join(", ")),
            promotion_ready: Some(u8::from(assessment.promotion_ready)),
            date: Some(submitted_at.format(DATE_FORMAT).to_string()),
            season: None,
            tier_stage: None,
            tier_points: None,
        }
    }

    pub fn to_record(&self, tier_parsing: TierParsing) -> anyhow::Result<HistoricalRecord> {
        let tier = Tier::parse(&self.tier, tier_parsing)?;
        Ok(HistoricalRecord {
            tier,
            features: self.features(),
            promotion_ready: self.promotion_ready.map(|label| label != 0),
        })
    }
}

pub fn read_population<P>(path: P) -> anyhow::Result<Vec<PopulationRow>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open population file: {}", path.display()))?;
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.with_context(|| format!("Failed to parse row {} of {}", i + 1, path.display()))
        })
        .collect()
}

pub fn to_records(
    rows: &[PopulationRow],
    tier_parsing: TierParsing,
) -> anyhow::Result<Vec<HistoricalRecord>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.to_record(tier_parsing)
                .with_context(|| format!("Invalid tier in row {}", i + 1))
        })
        .collect()
}

pub fn write_population<W>(writer: W, rows: &[PopulationRow]) -> anyhow::Result<()>
where
    W: io::Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row).context("Failed to write population row")?;
    }
    writer.flush().context("Failed to flush population table")?;
    Ok(())
}

/// Adds `row` to the end of the table at `path`, creating the table when
/// it does not exist yet.
///
/// The table is rewritten through a temporary file, so readers see either
/// the old or the new table.
pub fn append_population<P>(path: P, row: PopulationRow) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut rows = if path.exists() {
        read_population(path)?
    } else {
        vec![]
    };
    rows.push(row);

    let mut output = Output::open(path.to_owned())?;
    write_population(&mut output, &rows)
        .with_context(|| format!("Failed to append to {}", path.display()))?;
    output.commit()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    const TABLE: &str = concat!(
        "Player_ID,Player_Name,K/D_Ratio,Avg_Damage,Survival_Time,Tier,",
        "Win_Rate (%),Headshot_Rate (%),Drills,Opinions,Promotion_Ready,Date,",
        "Season,Tier_Stage,Tier_Points\n",
        "P1,Ace,2.5,410.0,12.0,Gold,22.0,18.0,,,1,2024-05-01,S2024_3,4,87\n",
        "P2,Bee,1.1,,8.0,Silver,10.0,9.0,,,,2024-05-02,,,\n",
        "P3,Cee,0.9,200.0,6.0,Mythic,8.0,7.0,,,0,,,,\n",
    );

    fn write_table(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("population.csv");
        std::fs::write(&path, TABLE).unwrap();
        path
    }

    #[test]
    fn test_reads_blank_cells_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let rows = read_population(write_table(dir.path())).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].player_name.as_deref(), Some("Ace"));
        assert_eq!(rows[0].features().unwrap().kd_ratio, 2.5);
        assert_eq!(rows[0].promotion_ready, Some(1));

        assert_eq!(rows[1].avg_damage, None);
        assert!(rows[1].features().is_none());
        assert_eq!(rows[1].promotion_ready, None);
        assert_eq!(rows[2].date, None);
        assert_eq!(rows[0].season.as_deref(), Some("S2024_3"));
        assert_eq!(rows[0].tier_stage, Some(4));
        assert_eq!(rows[0].tier_points, Some(87));
        assert_eq!(rows[1].season, None);
    }

    #[test]
    fn test_tier_parsing_modes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = read_population(write_table(dir.path())).unwrap();

        let records = to_records(&rows, TierParsing::Lenient).unwrap();
        assert_eq!(records[0].tier, Tier::Gold);
        assert_eq!(records[0].promotion_ready, Some(true));
        assert_eq!(records[2].tier, Tier::Bronze);
        assert_eq!(records[2].promotion_ready, Some(false));

        let err = to_records(&rows, TierParsing::Strict).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_minimal_columns_are_enough() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.csv");
        std::fs::write(
            &path,
            concat!(
                "K/D_Ratio,Avg_Damage,Survival_Time,Tier,Win_Rate (%),Headshot_Rate (%)\n",
                "1.0,200,5,Gold,10,10\n",
            ),
        )
        .unwrap();
        let rows = read_population(&path).unwrap();
        assert_eq!(rows[0].player_id, None);
        assert_eq!(rows[0].tier_stage, None);
        assert!(rows[0].features().is_some());
    }

    #[test]
    fn test_write_keeps_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let rows = read_population(write_table(dir.path())).unwrap();

        let mut buf = vec![];
        write_population(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, TABLE.lines().next().unwrap());
        assert!(text.lines().nth(2).unwrap().starts_with("P2,Bee,1.1,,8.0,Silver"));
        assert!(text.lines().nth(1).unwrap().ends_with("S2024_3,4,87"));
    }

    fn assessment(username: Option<&str>) -> Assessment {
        Assessment {
            username: username.map(str::to_owned),
            stats: FeatureVector {
                kd_ratio: 1.8,
                avg_damage: 320.0,
                avg_survival_time: 9.5,
                win_ratio: 14.0,
                headshot_percentage: 16.0,
            },
            tier: Tier::Platinum,
            promotion_ready: true,
            drills: vec!["Drill A", "Drill B"],
            tips: vec!["Tip A"],
        }
    }

    #[test]
    fn test_assessment_row_columns() {
        let submitted_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 5, 3).unwrap();

        let row = PopulationRow::from_assessment(&assessment(None), submitted_at);
        assert_eq!(row.player_name.as_deref(), Some("Guest"));
        assert_eq!(row.tier, "Platinum");
        assert_eq!(row.drills.as_deref(), Some("Drill A, Drill B"));
        assert_eq!(row.opinions.as_deref(), Some("Tip A"));
        assert_eq!(row.promotion_ready, Some(1));
        assert_eq!(row.date.as_deref(), Some("2024-06-01 09:05:03"));
        assert_eq!(row.features(), Some(assessment(None).stats));

        let named = PopulationRow::from_assessment(&assessment(Some("ace")), submitted_at);
        assert_eq!(named.player_name.as_deref(), Some("ace"));
        assert_ne!(named.player_id, row.player_id);
    }

    #[test]
    fn test_append_creates_then_extends_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("population.csv");
        let submitted_at = Utc::now();

        let guest = PopulationRow::from_assessment(&assessment(None), submitted_at);
        append_population(&path, guest).unwrap();
        assert_eq!(read_population(&path).unwrap().len(), 1);

        let existing = write_table(dir.path());
        let row = PopulationRow::from_assessment(&assessment(Some("ace")), submitted_at);
        append_population(&existing, row.clone()).unwrap();
        let rows = read_population(&existing).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].player_name.as_deref(), Some("Ace"));
        assert_eq!(rows[0].tier_points, Some(87));
        assert_eq!(rows[3], row);
    }
}
