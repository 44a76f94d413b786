//! Bill of materials, part tags and cost/weight estimation.
//!
//! Cost and weight formulas live outside the core; callers plug them in
//! through [`Estimator`].

use pipecad_ir::{ComponentInstance, ComponentType};
use serde::Serialize;

/// One grouped line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    /// Part type.
    pub component_type: ComponentType,
    /// Material name.
    pub material: String,
    /// Outer diameter in meters.
    pub od: f64,
    /// Wall thickness in meters.
    pub wall_thickness: f64,
    /// Run length in meters, for types that have one.
    pub length: Option<f64>,
    /// Number of identical parts.
    pub quantity: usize,
}

impl BomLine {
    fn matches(&self, instance: &ComponentInstance) -> bool {
        let p = &instance.properties;
        self.component_type == instance.component_type
            && self.material == p.material()
            && self.od == p.od()
            && self.wall_thickness == p.wall_thickness()
            && self.length == p.length(instance.component_type)
    }
}

/// Group `components` by type, material, OD, wall thickness and length.
///
/// Lines appear in order of first occurrence.
pub fn bill_of_materials(components: &[ComponentInstance]) -> Vec<BomLine> {
    let mut lines: Vec<BomLine> = Vec::new();
    for instance in components {
        if let Some(line) = lines.iter_mut().find(|l| l.matches(instance)) {
            line.quantity += 1;
            continue;
        }
        let p = &instance.properties;
        lines.push(BomLine {
            component_type: instance.component_type,
            material: p.material().to_string(),
            od: p.od(),
            wall_thickness: p.wall_thickness(),
            length: p.length(instance.component_type),
            quantity: 1,
        });
    }
    lines
}

/// Human-readable tag such as `"straight #3"`.
///
/// Numbering follows insertion order within each type, starting at 1.
pub fn tag_for(components: &[ComponentInstance], id: &str) -> Option<String> {
    let pos = components.iter().position(|c| c.id == id)?;
    let ty = components[pos].component_type;
    let n = components[..=pos].iter().filter(|c| c.component_type == ty).count();
    Some(format!("{ty} #{n}"))
}

/// External cost and weight formulas.
pub trait Estimator {
    /// Cost of one instance.
    fn unit_cost(&self, instance: &ComponentInstance) -> f64;

    /// Weight of one instance in kilograms.
    fn unit_weight(&self, instance: &ComponentInstance) -> f64;
}

/// Totals over a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Number of parts.
    pub count: usize,
    /// Summed cost.
    pub total_cost: f64,
    /// Summed weight in kilograms.
    pub total_weight: f64,
}

/// Sum `estimator` over `components`.
pub fn estimate(components: &[ComponentInstance], estimator: &impl Estimator) -> Estimate {
    components.iter().fold(Estimate::default(), |acc, c| Estimate {
        count: acc.count + 1,
        total_cost: acc.total_cost + estimator.unit_cost(c),
        total_weight: acc.total_weight + estimator.unit_weight(c),
    })
}
