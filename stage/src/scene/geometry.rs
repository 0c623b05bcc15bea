//! Geometry descriptors
//!
//! Shapes are described by their defining parameters only; tessellation is
//! left to the rendering backend.

use super::factory::FactoryError;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Lies in the local XY plane facing +Z.
    Plane {
        width: f32,
        depth: f32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Capsule {
        radius: f32,
        length: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        p: u32,
        q: u32,
    },
    Extrude {
        outline: Vec<[f32; 2]>,
        depth: f32,
        bevel: f32,
    },
}

fn positive(shape: &'static str, field: &'static str, value: f32) -> Result<(), FactoryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FactoryError::InvalidDimension {
            shape,
            field,
            value,
        })
    }
}

fn non_negative(shape: &'static str, field: &'static str, value: f32) -> Result<(), FactoryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FactoryError::InvalidDimension {
            shape,
            field,
            value,
        })
    }
}

fn cubic(p0: [f32; 2], p1: [f32; 2], p2: [f32; 2], p3: [f32; 2], t: f32) -> [f32; 2] {
    let s = 1.0 - t;
    let (a, b, c, d) = (s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t);
    [
        a * p0[0] + b * p1[0] + c * p2[0] + d * p3[0],
        a * p0[1] + b * p1[1] + c * p2[1] + d * p3[1],
    ]
}

/// Twice the signed area enclosed by `outline`.
fn doubled_area(outline: &[[f32; 2]]) -> f32 {
    let n = outline.len();
    (0..n)
        .map(|i| {
            let (a, b) = (outline[i], outline[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum()
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Plane { .. } => "plane",
            Geometry::Box { .. } => "box",
            Geometry::Capsule { .. } => "capsule",
            Geometry::Cylinder { .. } => "cylinder",
            Geometry::Torus { .. } => "torus",
            Geometry::TorusKnot { .. } => "torus-knot",
            Geometry::Extrude { .. } => "extrude",
        }
    }

    pub fn validate(&self) -> Result<(), FactoryError> {
        let shape = self.name();
        match self {
            Geometry::Plane { width, depth } => {
                positive(shape, "width", *width)?;
                positive(shape, "depth", *depth)
            }
            Geometry::Box {
                width,
                height,
                depth,
            } => {
                positive(shape, "width", *width)?;
                positive(shape, "height", *height)?;
                positive(shape, "depth", *depth)
            }
            Geometry::Capsule { radius, length } => {
                positive(shape, "radius", *radius)?;
                non_negative(shape, "length", *length)
            }
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                non_negative(shape, "radius_top", *radius_top)?;
                non_negative(shape, "radius_bottom", *radius_bottom)?;
                positive(shape, "radius", radius_top.max(*radius_bottom))?;
                positive(shape, "height", *height)
            }
            Geometry::Torus { radius, tube } => {
                positive(shape, "radius", *radius)?;
                positive(shape, "tube", *tube)
            }
            Geometry::TorusKnot { radius, tube, p, q } => {
                positive(shape, "radius", *radius)?;
                positive(shape, "tube", *tube)?;
                if *p == 0 || *q == 0 {
                    return Err(FactoryError::MalformedShape(format!(
                        "torus-knot winding ({}, {}) must be non-zero",
                        p, q
                    )));
                }
                Ok(())
            }
            Geometry::Extrude {
                outline,
                depth,
                bevel,
            } => {
                positive(shape, "depth", *depth)?;
                non_negative(shape, "bevel", *bevel)?;
                if outline.iter().flatten().any(|v| !v.is_finite()) {
                    return Err(FactoryError::MalformedShape(
                        "outline contains non-finite coordinates".into(),
                    ));
                }
                let mut distinct: Vec<[f32; 2]> = Vec::with_capacity(outline.len());
                for point in outline {
                    if !distinct.contains(point) {
                        distinct.push(*point);
                    }
                }
                if distinct.len() < 3 {
                    return Err(FactoryError::MalformedShape(format!(
                        "outline needs at least 3 distinct points, got {}",
                        distinct.len()
                    )));
                }
                if doubled_area(outline).abs() <= f32::EPSILON {
                    return Err(FactoryError::MalformedShape(
                        "outline encloses no area".into(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Closed heart outline built from six cubic segments, `steps` samples each.
    pub fn heart_outline(steps: usize) -> Vec<[f32; 2]> {
        let steps = steps.max(1);
        let segments: [[[f32; 2]; 4]; 6] = [
            [[5.0, 5.0], [5.0, 5.0], [4.0, 0.0], [0.0, 0.0]],
            [[0.0, 0.0], [-6.0, 0.0], [-6.0, 7.0], [-6.0, 7.0]],
            [[-6.0, 7.0], [-6.0, 11.0], [-3.0, 15.4], [5.0, 19.0]],
            [[5.0, 19.0], [12.0, 15.4], [16.0, 11.0], [16.0, 7.0]],
            [[16.0, 7.0], [16.0, 7.0], [16.0, 0.0], [10.0, 0.0]],
            [[10.0, 0.0], [7.0, 0.0], [5.0, 5.0], [5.0, 5.0]],
        ];
        let mut outline = Vec::with_capacity(segments.len() * steps);
        for [p0, p1, p2, p3] in segments.iter() {
            for i in 0..steps {
                outline.push(cubic(*p0, *p1, *p2, *p3, i as f32 / steps as f32));
            }
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        let bad = Geometry::Box {
            width: 1.0,
            height: -1.0,
            depth: 1.0,
        };
        match bad.validate() {
            Err(FactoryError::InvalidDimension { field, .. }) => assert_eq!(field, "height"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(Geometry::Torus {
            radius: f32::NAN,
            tube: 0.2
        }
        .validate()
        .is_err());
    }

    #[test]
    fn cone_is_a_valid_cylinder() {
        let cone = Geometry::Cylinder {
            radius_top: 0.0,
            radius_bottom: 0.5,
            height: 1.0,
        };
        assert!(cone.validate().is_ok());
    }

    #[test]
    fn degenerate_outline_is_malformed() {
        let line = Geometry::Extrude {
            outline: vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]],
            depth: 1.0,
            bevel: 0.0,
        };
        assert!(matches!(line.validate(), Err(FactoryError::MalformedShape(_))));

        let duplicated = Geometry::Extrude {
            outline: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 0.0]],
            depth: 1.0,
            bevel: 0.0,
        };
        assert!(matches!(
            duplicated.validate(),
            Err(FactoryError::MalformedShape(_))
        ));
    }

    #[test]
    fn heart_outline_is_closed_and_valid() {
        let outline = Geometry::heart_outline(8);
        assert_eq!(outline.len(), 48);
        assert_eq!(outline[0], [5.0, 5.0]);
        let heart = Geometry::Extrude {
            outline,
            depth: 2.0,
            bevel: 0.5,
        };
        assert!(heart.validate().is_ok());
    }
}
