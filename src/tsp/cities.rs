//! Named city sets.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;
use rand::Rng;

use super::distance::euclidean_distance_matrix;
use crate::error::AcoError;

/// A set of named cities with planar positions.
///
/// The text format is one city per line: `name,x,y`.
///
/// # Examples
///
/// ```
/// use aco_tsp::tsp::CityData;
///
/// let cities = CityData::parse("Oslo,10.7,59.9\nBergen,5.3,60.4\n").unwrap();
/// assert_eq!(cities.len(), 2);
/// assert_eq!(cities.named_tour(&[1, 0]), vec!["Bergen", "Oslo", "Bergen"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CityData {
    names: Vec<String>,
    positions: Vec<[f64; 2]>,
}

impl CityData {
    /// Empty city set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a city.
    pub fn push(&mut self, name: impl Into<String>, x: f64, y: f64) {
        self.names.push(name.into());
        self.positions.push([x, y]);
    }

    /// Parses `name,x,y` lines. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, AcoError> {
        let mut cities = Self::new();
        for (idx, line) in text.lines().enumerate() {
            cities.parse_line(idx + 1, line)?;
        }
        Ok(cities)
    }

    /// Reads `name,x,y` lines from `reader`.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, AcoError> {
        let mut cities = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            cities.parse_line(idx + 1, &line?)?;
        }
        Ok(cities)
    }

    /// Loads a city file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AcoError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// `n` cities with uniform float coordinates in `[0, max_x] x [0, max_y]`,
    /// rounded to `decimals` places. Named `"0"` to `"n-1"`.
    pub fn random_float<R: Rng>(
        n: usize,
        max_x: f64,
        max_y: f64,
        decimals: u32,
        rng: &mut R,
    ) -> Self {
        let scale = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * scale).round() / scale;

        let mut cities = Self::new();
        for i in 0..n {
            let x = round(rng.random_range(0.0..=max_x));
            let y = round(rng.random_range(0.0..=max_y));
            cities.push(i.to_string(), x, y);
        }
        cities
    }

    /// `n` cities with integer coordinates in `[0, max_x] x [0, max_y]`.
    /// Named `"1"` to `"n"`.
    pub fn random_int<R: Rng>(n: usize, max_x: u32, max_y: u32, rng: &mut R) -> Self {
        let mut cities = Self::new();
        for i in 0..n {
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            cities.push((i + 1).to_string(), f64::from(x), f64::from(y));
        }
        cities
    }

    /// Renders the set back into `name,x,y` lines.
    pub fn to_csv(&self) -> String {
        self.names
            .iter()
            .zip(&self.positions)
            .map(|(name, [x, y])| format!("{name},{x},{y}\n"))
            .collect()
    }

    /// Writes the set to `path` in `name,x,y` format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AcoError> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Euclidean distance matrix with the sentinel diagonal.
    pub fn distance_matrix(&self) -> Array2<f64> {
        euclidean_distance_matrix(&self.positions)
    }

    /// City names along `tour`, closed by repeating the first city.
    ///
    /// Indices outside the set are skipped.
    pub fn named_tour(&self, tour: &[usize]) -> Vec<&str> {
        let mut names: Vec<&str> = tour
            .iter()
            .filter_map(|&i| self.names.get(i).map(String::as_str))
            .collect();
        if let Some(&first) = names.first() {
            names.push(first);
        }
        names
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> Result<(), AcoError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(AcoError::Parse {
                line: line_no,
                message: format!("expected name,x,y but got '{line}'"),
            });
        }

        let coord = |field: &str, axis: &str| {
            field.parse::<f64>().map_err(|e| AcoError::Parse {
                line: line_no,
                message: format!("invalid {axis} coordinate '{field}': {e}"),
            })
        };
        let x = coord(fields[1], "x")?;
        let y = coord(fields[2], "y")?;
        self.push(fields[0], x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp::DIAGONAL_SENTINEL;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_basic() {
        let cities = CityData::parse("A,1,2\n\nB, 3.5 ,4\r\n").unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities.names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(cities.positions(), &[[1.0, 2.0], [3.5, 4.0]]);
    }

    #[test]
    fn test_parse_missing_field() {
        let err = CityData::parse("A,1,2\nB,3\n").unwrap_err();
        assert!(matches!(err, AcoError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_bad_number() {
        let err = CityData::parse("A,one,2\n").unwrap_err();
        match err {
            AcoError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("x coordinate"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_from_reader() {
        let text = "Beijing,116.46,39.92\nShanghai,121.48,31.22\n";
        let cities = CityData::from_reader(text.as_bytes()).unwrap();
        assert_eq!(cities.len(), 2);
    }

    #[test]
    fn test_csv_roundtrip() {
        let mut cities = CityData::new();
        cities.push("a", 0.25, 3.0);
        cities.push("b", 7.0, 1.5);
        assert_eq!(cities.to_csv(), "a,0.25,3\nb,7,1.5\n");
        assert_eq!(CityData::parse(&cities.to_csv()).unwrap(), cities);
    }

    #[test]
    fn test_save_and_load() {
        let mut rng = StdRng::seed_from_u64(42);
        let cities = CityData::random_int(6, 100, 100, &mut rng);
        let path = std::env::temp_dir().join(format!("aco_tsp_cities_{}.txt", std::process::id()));
        cities.save(&path).unwrap();
        let loaded = CityData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, cities);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CityData::load("/nonexistent/aco_tsp/cities.txt").unwrap_err();
        assert!(matches!(err, AcoError::Io(_)));
    }

    #[test]
    fn test_random_float_bounds_and_rounding() {
        let mut rng = StdRng::seed_from_u64(42);
        let cities = CityData::random_float(20, 50.0, 10.0, 2, &mut rng);
        assert_eq!(cities.len(), 20);
        assert_eq!(cities.names()[0], "0");
        for &[x, y] in cities.positions() {
            assert!((0.0..=50.0).contains(&x));
            assert!((0.0..=10.0).contains(&y));
            assert!(((x * 100.0).round() - x * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_random_int_names_and_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let cities = CityData::random_int(10, 100, 100, &mut rng);
        assert_eq!(cities.names()[0], "1");
        assert_eq!(cities.names()[9], "10");
        for &[x, y] in cities.positions() {
            assert_eq!(x.fract(), 0.0);
            assert!(x <= 100.0 && y <= 100.0);
        }
    }

    #[test]
    fn test_distance_matrix() {
        let cities = CityData::parse("a,0,0\nb,3,4\n").unwrap();
        let d = cities.distance_matrix();
        assert_eq!(d[[0, 1]], 5.0);
        assert_eq!(d[[0, 0]], DIAGONAL_SENTINEL);
    }

    #[test]
    fn test_named_tour_closed() {
        let cities = CityData::parse("a,0,0\nb,1,0\nc,1,1\n").unwrap();
        assert_eq!(cities.named_tour(&[2, 0, 1]), vec!["c", "a", "b", "c"]);
        assert!(cities.named_tour(&[]).is_empty());
    }
}
