use serde::{Deserialize, Serialize};

/// One key of a [`FloatCurve`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub parameter: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

/// A piecewise cubic Hermite curve over a float parameter.
///
/// Points are kept sorted by parameter.
///
/// # Examples
///
/// ```
/// use ee_reflect::core_types::FloatCurve;
///
/// let mut curve = FloatCurve::default();
/// curve.add_point(1.0, 10.0, 0.0, 0.0);
/// curve.add_point(0.0, 0.0, 0.0, 0.0);
///
/// assert_eq!(curve.evaluate(-1.0), 0.0);
/// assert_eq!(curve.evaluate(0.5), 5.0);
/// assert_eq!(curve.evaluate(2.0), 10.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatCurve {
    points: Vec<CurvePoint>,
}

impl FloatCurve {
    #[inline]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Insert a point, keeping the points ordered. A point at an existing
    /// parameter replaces it.
    pub fn add_point(&mut self, parameter: f32, value: f32, in_tangent: f32, out_tangent: f32) {
        let point = CurvePoint { parameter, value, in_tangent, out_tangent };
        let index = self.points.partition_point(|p| p.parameter < parameter);
        match self.points.get_mut(index) {
            Some(existing) if existing.parameter == parameter => *existing = point,
            _ => self.points.insert(index, point),
        }
    }

    pub fn remove_point(&mut self, index: usize) -> Option<CurvePoint> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Sample the curve; values outside the keyed range clamp to the end points.
    pub fn evaluate(&self, parameter: f32) -> f32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0.0;
        };

        if parameter <= first.parameter {
            return first.value;
        }
        if parameter >= last.parameter {
            return last.value;
        }

        let upper = self.points.partition_point(|p| p.parameter <= parameter);
        let a = &self.points[upper - 1];
        let b = &self.points[upper];

        let length = b.parameter - a.parameter;
        let t = (parameter - a.parameter) / length;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * a.value + h10 * length * a.out_tangent + h01 * b.value + h11 * length * b.in_tangent
    }

    pub(crate) fn from_points(mut points: Vec<CurvePoint>) -> Self {
        points.sort_by(|a, b| a.parameter.total_cmp(&b.parameter));
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_stay_sorted() {
        let mut curve = FloatCurve::default();
        curve.add_point(2.0, 0.0, 0.0, 0.0);
        curve.add_point(0.0, 0.0, 0.0, 0.0);
        curve.add_point(1.0, 0.0, 0.0, 0.0);
        curve.add_point(1.0, 4.0, 0.0, 0.0);

        let parameters: Vec<f32> = curve.points().iter().map(|p| p.parameter).collect();
        assert_eq!(parameters, [0.0, 1.0, 2.0]);
        assert_eq!(curve.points()[1].value, 4.0);
    }

    #[test]
    fn empty_curve_is_zero() {
        assert_eq!(FloatCurve::default().evaluate(3.0), 0.0);
    }

    #[test]
    fn tangents_shape_the_segment() {
        let mut curve = FloatCurve::default();
        curve.add_point(0.0, 0.0, 0.0, 1.0);
        curve.add_point(1.0, 0.0, 1.0, 0.0);
        assert!(curve.evaluate(0.25) > 0.0);
    }
}
