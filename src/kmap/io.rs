//! File formats for grids and problem specs: grid text files, YAML/JSON
//! problem lists, share-link queries and batch CSV

use super::grid::{CellState, KmapGrid};
use super::layout::GridLayout;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The persisted and shared form of one problem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub num_vars: u32,
    pub minterms: Vec<u32>,
    #[serde(default)]
    pub dont_cares: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl ProblemSpec {
    pub fn new(num_vars: u32, minterms: Vec<u32>, dont_cares: Vec<u32>) -> Self {
        Self {
            num_vars,
            minterms,
            dont_cares,
            expression: None,
        }
    }
}

/// Load a grid from a text file
/// Format: one line per grid row in Gray layout order, with '1' for on,
/// '0' for off and 'X' (or '-') for don't-care
pub fn load_grid_from_file<P: AsRef<Path>>(path: P, num_vars: u32) -> Result<KmapGrid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content, num_vars)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from its text representation
pub fn parse_grid_from_string(content: &str, num_vars: u32) -> Result<KmapGrid> {
    let layout = GridLayout::new(num_vars)?;

    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.len() != layout.rows() {
        anyhow::bail!(
            "Expected {} rows for {} variables, found {}",
            layout.rows(),
            num_vars,
            lines.len()
        );
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != layout.cols() {
            anyhow::bail!(
                "Row {} has length {}, expected {}",
                row_idx,
                symbols.len(),
                layout.cols()
            );
        }

        let mut row = Vec::with_capacity(symbols.len());
        for (col_idx, ch) in symbols.into_iter().enumerate() {
            match CellState::from_symbol(ch) {
                Some(state) => row.push(state),
                None => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '0', '1' and 'X' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            }
        }
        rows.push(row);
    }

    Ok(KmapGrid::from_rows(layout, rows)?)
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &KmapGrid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid.to_string())
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Parse a comma separated minterm list such as `"0, 1, 5"`
pub fn parse_minterm_list(input: &str) -> Result<Vec<u32>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u32>()
                .with_context(|| format!("Invalid minterm '{}'", token))
        })
        .collect()
}

/// Load a list of problems; `.json` files are JSON, everything else YAML
pub fn load_problems_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ProblemSpec>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read problem file: {}", path.display()))?;

    let problems = if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON problems: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML problems: {}", path.display()))?
    };

    Ok(problems)
}

/// Save a list of problems in the format implied by the extension
pub fn save_problems_to_file<P: AsRef<Path>>(problems: &[ProblemSpec], path: P) -> Result<()> {
    let path = path.as_ref();
    let content = if is_json(path) {
        serde_json::to_string_pretty(problems).context("Failed to serialize problems")?
    } else {
        serde_yaml::to_string(problems).context("Failed to serialize problems")?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write problem file: {}", path.display()))?;

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Decode `%XX` escapes; malformed escapes are kept as written
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| bytes.get(i + 1..i + 3))
            .flatten()
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                i += 3;
            }
            None => {
                decoded.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Encode a problem as a share-link query string, e.g. `v=3&m=0,1,5&d=7`
pub fn encode_share_query(spec: &ProblemSpec) -> String {
    let mut query = format!("v={}&m={}", spec.num_vars, spec.minterms.iter().join(","));
    if !spec.dont_cares.is_empty() {
        query.push_str(&format!("&d={}", spec.dont_cares.iter().join(",")));
    }
    query
}

/// Decode a share-link query. Returns `None` when `v` or `m` is missing.
/// A leading `?` or a full URL are accepted; list entries that are not
/// numbers are dropped.
pub fn decode_share_query(query: &str) -> Result<Option<ProblemSpec>> {
    let query = query.split_once('?').map_or(query, |(_, q)| q);

    let mut num_vars = None;
    let mut minterms = None;
    let mut dont_cares = Vec::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = percent_decode(value);
        match key {
            "v" => {
                num_vars = Some(
                    value
                        .trim()
                        .parse::<u32>()
                        .with_context(|| format!("Invalid variable count '{}'", value))?,
                )
            }
            "m" => minterms = Some(lenient_numbers(&value)),
            "d" => dont_cares = lenient_numbers(&value),
            _ => {}
        }
    }

    Ok(match (num_vars, minterms) {
        (Some(num_vars), Some(minterms)) => Some(ProblemSpec::new(num_vars, minterms, dont_cares)),
        _ => None,
    })
}

fn lenient_numbers(value: &str) -> Vec<u32> {
    value
        .split(',')
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .collect()
}

/// Render problems as CSV with a `Variables,Minterms,Dont Cares,Expression` header
pub fn problems_to_csv(problems: &[ProblemSpec]) -> String {
    let mut csv = String::from("Variables,Minterms,Dont Cares,Expression\n");
    for spec in problems {
        csv.push_str(&format!(
            "{},\"{}\",\"{}\",{}\n",
            spec.num_vars,
            spec.minterms.iter().join(","),
            spec.dont_cares.iter().join(","),
            spec.expression.as_deref().unwrap_or("")
        ));
    }
    csv
}

/// Create example grid and problem files for the `setup` command
pub fn create_example_inputs<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Four corners of a 4x4 map (B'D')
    std::fs::write(dir.join("corners.txt"), "1001\n0000\n0000\n1001\n")
        .context("Failed to write corners.txt")?;

    // Top and bottom rows of a 4x4 map (B')
    std::fs::write(dir.join("top_bottom.txt"), "1111\n0000\n0000\n1111\n")
        .context("Failed to write top_bottom.txt")?;

    // Three-variable map with a don't-care
    std::fs::write(dir.join("three_var.txt"), "1X01\n0010\n")
        .context("Failed to write three_var.txt")?;

    let problems = vec![
        ProblemSpec::new(3, vec![3, 4, 5], vec![]),
        ProblemSpec::new(4, vec![0, 2, 8, 10], vec![]),
        ProblemSpec::new(4, vec![1, 3, 7, 11, 15], vec![0, 2, 5]),
        ProblemSpec::new(5, vec![0, 1, 2, 3, 16, 17, 18, 19], vec![31]),
    ];
    save_problems_to_file(&problems, dir.join("batch.yaml"))?;

    Ok(())
}
