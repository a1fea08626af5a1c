//! Decision variables and their bounds.

/// Stable column index of a variable within its [`Model`](super::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the model's variable list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed interval `[lower, upper]` of a variable's domain.
///
/// Either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound (`f64::NEG_INFINITY` if unbounded below).
    pub lower: f64,
    /// Upper bound (`f64::INFINITY` if unbounded above).
    pub upper: f64,
}

impl Bounds {
    /// Creates a bound interval.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`.
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// `(-inf, +inf)`.
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Whether `lower <= upper + tol`.
    pub fn is_consistent(&self, tol: f64) -> bool {
        self.lower <= self.upper + tol
    }

    /// Whether `value` lies inside the interval, up to `tol`.
    pub fn contains(&self, value: f64, tol: f64) -> bool {
        value >= self.lower - tol && value <= self.upper + tol
    }

    /// Width of the interval (infinite if either end is).
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A decision variable.
///
/// Defaults to a continuous variable on `[0, +inf)`.
///
/// # Examples
///
/// ```
/// use u_linprog::model::Variable;
///
/// let x = Variable::new("x").with_upper(10.0).integer();
/// assert_eq!(x.lower(), 0.0);
/// assert_eq!(x.upper(), 10.0);
/// assert!(x.is_integer());
///
/// let y = Variable::new("y").free();
/// assert!(y.lower().is_infinite());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) bounds: Bounds,
    pub(crate) integer: bool,
    pub(crate) index: usize,
}

impl Variable {
    /// Creates a continuous, non-negative variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Bounds::non_negative(),
            integer: false,
            index: 0,
        }
    }

    /// Creates an integer variable on `[0, 1]`.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name).with_bounds(0.0, 1.0).integer()
    }

    /// Sets both bounds.
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.bounds = Bounds::new(lower, upper);
        self
    }

    /// Sets the lower bound.
    pub fn with_lower(mut self, lower: f64) -> Self {
        self.bounds.lower = lower;
        self
    }

    /// Sets the upper bound.
    pub fn with_upper(mut self, upper: f64) -> Self {
        self.bounds.upper = upper;
        self
    }

    /// Removes both bounds.
    pub fn free(mut self) -> Self {
        self.bounds = Bounds::free();
        self
    }

    /// Flags the variable as integral.
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Sets the integrality flag.
    pub fn with_integer(mut self, integer: bool) -> Self {
        self.integer = integer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower(&self) -> f64 {
        self.bounds.lower
    }

    pub fn upper(&self) -> f64 {
        self.bounds.upper
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// Column index assigned when the variable was added to a model.
    pub fn id(&self) -> VarId {
        VarId(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_variable() {
        let v = Variable::new("x");
        assert_eq!(v.name(), "x");
        assert_eq!(v.lower(), 0.0);
        assert!(v.upper().is_infinite());
        assert!(!v.is_integer());
    }

    #[test]
    fn test_binary() {
        let b = Variable::binary("b");
        assert_eq!(b.bounds(), Bounds::new(0.0, 1.0));
        assert!(b.is_integer());
    }

    #[test]
    fn test_builder_chain() {
        let v = Variable::new("z").with_lower(-5.0).with_upper(5.0).with_integer(true);
        assert_eq!(v.lower(), -5.0);
        assert_eq!(v.upper(), 5.0);
        assert!(v.is_integer());
    }

    #[test]
    fn test_bounds_helpers() {
        let b = Bounds::new(1.0, 3.0);
        assert!(b.is_consistent(0.0));
        assert!(b.contains(3.0 + 1e-10, 1e-9));
        assert!(!b.contains(3.1, 1e-9));
        assert!((b.width() - 2.0).abs() < 1e-12);
        assert!(!Bounds::new(2.0, 1.0).is_consistent(1e-9));
        assert!(Bounds::free().width().is_infinite());
    }
}
