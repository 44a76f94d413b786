//! Capturing selections as templates and placing templates back.
//!
//! An assembly template stores every part relative to the first captured
//! part (the origin): offsets live in the origin's local frame and
//! rotations are relative to the origin's rotation. Placing the template
//! at a target pose is then one rigid transform per part, so the internal
//! shape survives any placement orientation.

use pipecad_ir::{new_component_id, ComponentInstance, Template, TemplatePart, TemplateShape};
use pipecad_math::Pose;

/// Capture `instances` as a named template.
///
/// Zero instances yields `None`. One instance yields a single-part template
/// holding its type and properties. Otherwise the first instance becomes the
/// origin of an assembly template.
pub fn capture_template(name: impl Into<String>, instances: &[&ComponentInstance]) -> Option<Template> {
    let (first, rest) = instances.split_first()?;

    let shape = if rest.is_empty() {
        TemplateShape::Single {
            component_type: first.component_type,
            properties: first.properties.clone(),
        }
    } else {
        let origin = first.pose();
        let parts = instances
            .iter()
            .map(|instance| {
                let relative = instance.pose().relative_to(&origin);
                TemplatePart {
                    component_type: instance.component_type,
                    properties: instance.properties.clone(),
                    offset: relative.position.into(),
                    rotation: relative.rotation_degrees().into(),
                }
            })
            .collect();
        TemplateShape::Assembly { parts }
    };

    Some(Template::new(name, shape))
}

/// Create the instances of `template` with its origin at `target`.
///
/// Assembly parts all share one freshly generated assembly id; a
/// single-part template produces one untagged instance.
pub fn instantiate_template(template: &Template, target: &Pose) -> Vec<ComponentInstance> {
    match &template.shape {
        TemplateShape::Single {
            component_type,
            properties,
        } => {
            let mut instance = ComponentInstance::new(
                *component_type,
                target.position.into(),
                target.rotation_degrees().into(),
            )
            .with_properties(properties.clone());
            instance.set_pose(target);
            vec![instance]
        }
        TemplateShape::Assembly { parts } => {
            let assembly_id = new_component_id();
            parts
                .iter()
                .map(|part| {
                    let relative = Pose::from_degrees(part.offset.to_point(), part.rotation.into());
                    let world = target.then(&relative);
                    let mut instance = ComponentInstance::new(
                        part.component_type,
                        world.position.into(),
                        world.rotation_degrees().into(),
                    )
                    .with_properties(part.properties.clone())
                    .with_assembly(assembly_id.clone());
                    instance.set_pose(&world);
                    instance
                })
                .collect()
        }
    }
}
