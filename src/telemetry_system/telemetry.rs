use crate::comparison::comparator::{ComparisonResult, CurvePoint};
use crate::control::terrain::TerrainConfig;

/// Human-readable summary of a comparison run.
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Report { lines: Vec::new() }
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_distance(distance: f64) -> String {
        if distance >= 1000.0 {
            format!("{:.2} km", distance / 1000.0)
        } else {
            format!("{:.2} m", distance)
        }
    }

    pub fn add_terrain(&mut self, terrain: &TerrainConfig) {
        let distances = terrain.class_distances();
        self.lines.push("--- Route ---".to_string());
        self.lines.push(format!(
            "Distance: {:.1} km, elevation gain: {:.0} m, stop every {}",
            terrain.total_distance,
            terrain.total_elevation_gain,
            Self::format_distance(terrain.stop_spacing)
        ));
        self.lines.push(format!(
            "Flat: {}, climbing: {}, descending: {}",
            Self::format_distance(distances.flat),
            Self::format_distance(distances.climb),
            Self::format_distance(distances.descent)
        ));
    }

    pub fn add_comparison(&mut self, result: &ComparisonResult) {
        self.lines.push("--- Comparison ---".to_string());
        for bike in &result.per_bike {
            self.lines.push(format!(
                "{}: total time {} ({:.1} min), flat cruising speed {:.2} km/h",
                bike.name,
                Self::format_time(bike.total_time),
                bike.total_time / 60.0,
                bike.final_velocity
            ));
        }
        let verdict = match result.faster_bike() {
            Some(bike) => format!(
                "{} is faster by {:.2} min",
                bike.name,
                result.time_difference_minutes.abs()
            ),
            None => "Both bikes finish at the same time".to_string(),
        };
        self.lines.push(verdict);
    }

    pub fn add_curves(&mut self, result: &ComparisonResult, curves: &[CurvePoint]) {
        self.lines.push("--- Acceleration from rest (flat) ---".to_string());
        let header = format!(
            "{:>8} | {:>12} | {:>12} | {:>12} | {:>12}",
            "time",
            format!("{} km/h", result.bike_a().name),
            format!("{} km/h", result.bike_b().name),
            format!("{} m", result.bike_a().name),
            format!("{} m", result.bike_b().name)
        );
        self.lines.push(header);
        for point in curves {
            self.lines.push(format!(
                "{:>8} | {:>12.2} | {:>12.2} | {:>12.1} | {:>12.1}",
                Self::format_time(point.time),
                point.velocity_a_kmh,
                point.velocity_b_kmh,
                point.distance_a,
                point.distance_b
            ));
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn display(&self) {
        println!("{}", self.render());
    }
}

impl Default for Report {
    fn default() -> Self {
        Report::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::comparator::BikeSummary;

    fn sample_result(difference: f64) -> ComparisonResult {
        ComparisonResult {
            per_bike: [
                BikeSummary {
                    name: "Commuter".to_string(),
                    final_velocity: 35.0,
                    total_time: 4000.0,
                },
                BikeSummary {
                    name: "Racer".to_string(),
                    final_velocity: 37.0,
                    total_time: 4000.0 + difference * 60.0,
                },
            ],
            time_difference_minutes: difference,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(Report::format_time(42.5), "42.50s");
        assert_eq!(Report::format_time(125.0), "2m 5.00s");
        assert_eq!(Report::format_time(3725.0), "1h 2m 5.00s");
    }

    #[test]
    fn test_comparison_names_the_faster_bike() {
        let mut report = Report::new();
        report.add_comparison(&sample_result(-3.5));
        let text = report.render();
        assert!(text.contains("Racer is faster by 3.50 min"));
        assert!(text.contains("Commuter: total time 1h 6m 40.00s"));
    }

    #[test]
    fn test_tie_is_reported() {
        let mut report = Report::new();
        report.add_comparison(&sample_result(0.0));
        assert!(report.render().contains("same time"));
    }

    #[test]
    fn test_terrain_section() {
        let mut report = Report::new();
        report.add_terrain(&TerrainConfig::default());
        let text = report.render();
        assert!(text.contains("stop every 2.00 km"));
        assert!(text.contains("climbing: 363.00 km"));
    }
}
