//! Wheel helpers that produce the inputs of [`BikeConfig`](crate::BikeConfig).

use serde::Serialize;

const GRAMS_PER_KILOGRAM: f64 = 1000.0;
const MILLIMETERS_PER_METER: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelSize {
    pub name: &'static str,
    pub bead_seat_diameter: f64, // mm
    pub description: &'static str,
}

pub static COMMON_WHEEL_SIZES: [WheelSize; 8] = [
    WheelSize {
        name: "700C (Road)",
        bead_seat_diameter: 622.0,
        description: "Standard road bike wheel (700x23c, 700x25c, etc.)",
    },
    WheelSize {
        name: "650B (27.5\")",
        bead_seat_diameter: 584.0,
        description: "Mountain bike and gravel bike wheel",
    },
    WheelSize {
        name: "26\" MTB",
        bead_seat_diameter: 559.0,
        description: "Traditional mountain bike wheel",
    },
    WheelSize {
        name: "29\" (29er)",
        bead_seat_diameter: 622.0,
        description: "Large mountain bike wheel (same diameter as 700C)",
    },
    WheelSize {
        name: "24\" Kids",
        bead_seat_diameter: 507.0,
        description: "Common children's bike wheel",
    },
    WheelSize {
        name: "20\" BMX/Folding",
        bead_seat_diameter: 406.0,
        description: "BMX and folding bike wheel",
    },
    WheelSize {
        name: "16\" Kids",
        bead_seat_diameter: 349.0,
        description: "Small children's bike wheel",
    },
    WheelSize {
        name: "12\" Kids",
        bead_seat_diameter: 203.0,
        description: "Very small children's bike wheel",
    },
];

pub fn find_wheel_size(name: &str) -> Option<&'static WheelSize> {
    COMMON_WHEEL_SIZES
        .iter()
        .find(|size| size.name.eq_ignore_ascii_case(name))
}

/// Rolling radius in meters of a rim with the given tire mounted.
pub fn rolling_radius(bead_seat_diameter: f64, tire_thickness: f64) -> f64 {
    (bead_seat_diameter / 2.0 + tire_thickness) / MILLIMETERS_PER_METER
}

/// Moments of inertia (kg·m²) of a wheel built from rim, tire and spokes.
///
/// Rim and tire are treated as thin rings at their centres of mass; the
/// spokes as a uniform disk of rods ending at the inner rim edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelInertia {
    pub rim_center_distance: f64,  // mm
    pub tire_center_distance: f64, // mm
    pub rim: f64,
    pub tire: f64,
    pub spokes: f64,
    pub per_wheel: f64,
    pub total: f64, // both wheels
}

impl WheelInertia {
    /// Masses in grams, lengths in millimetres.
    pub fn from_components(
        rim_weight: f64,
        rim_diameter: f64,
        rim_height: f64,
        tire_weight: f64,
        tire_thickness: f64,
        spokes_weight: f64,
    ) -> Self {
        let rim_center_distance = rim_diameter / 2.0 - rim_height / 2.0;
        let tire_center_distance = rim_diameter / 2.0 + tire_thickness / 2.0;

        let rim = rim_weight / GRAMS_PER_KILOGRAM
            * (rim_center_distance / MILLIMETERS_PER_METER).powi(2);
        let tire = tire_weight / GRAMS_PER_KILOGRAM
            * (tire_center_distance / MILLIMETERS_PER_METER).powi(2);
        let spoke_length = (rim_diameter / 2.0 - rim_height) / MILLIMETERS_PER_METER;
        let spokes = spoke_length.powi(3) / 3.0 * (spokes_weight / GRAMS_PER_KILOGRAM);

        let per_wheel = rim + tire + spokes;
        WheelInertia {
            rim_center_distance,
            tire_center_distance,
            rim,
            tire,
            spokes,
            per_wheel,
            total: per_wheel * 2.0,
        }
    }
}
