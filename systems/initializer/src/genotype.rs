use rand::{seq::SliceRandom, Rng};

/// Closed interval genes are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

impl Bounds {
    /// Creates an interval spanning both values, in either order.
    ///
    /// Returns `None` unless both values are finite.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(Self {
            lower: a.min(b),
            upper: a.max(b),
        })
    }

    /// Smallest value a gene may take.
    #[must_use]
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    /// Largest value a gene may take.
    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.lower..=self.upper)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }
}

/// Genotype describing a point on the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointGenotype {
    x: f64,
    y: f64,
}

impl PointGenotype {
    /// Creates a point genotype.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

/// Genotype holding a vector of real-valued genes.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatGenotype {
    genes: Vec<f64>,
}

impl FloatGenotype {
    /// Creates a genotype from its genes.
    #[must_use]
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Genes in declaration order.
    #[must_use]
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }
}

/// Genotype holding an ordering of `0..n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationGenotype {
    permutation: Vec<usize>,
}

impl PermutationGenotype {
    /// Creates a genotype from an ordering.
    #[must_use]
    pub fn new(permutation: Vec<usize>) -> Self {
        Self { permutation }
    }

    /// The ordering carried by the genotype.
    #[must_use]
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }
}

/// Appends uniformly sampled point genotypes.
#[derive(Clone, Copy, Debug)]
pub struct PointInitializer {
    size: usize,
    bounds: Bounds,
}

impl PointInitializer {
    /// Creates an initializer producing `size` points within `bounds`.
    #[must_use]
    pub const fn new(size: usize, bounds: Bounds) -> Self {
        Self { size, bounds }
    }

    /// Appends `size` fresh genotypes to `out`.
    pub fn process<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<PointGenotype>) {
        out.reserve(self.size);
        for _ in 0..self.size {
            let x = self.bounds.sample(rng);
            let y = self.bounds.sample(rng);
            out.push(PointGenotype::new(x, y));
        }
    }
}

impl Default for PointInitializer {
    fn default() -> Self {
        Self::new(100, Bounds::default())
    }
}

/// Appends uniformly sampled float genotypes.
#[derive(Clone, Copy, Debug)]
pub struct FloatInitializer {
    dims: usize,
    size: usize,
    bounds: Bounds,
}

impl FloatInitializer {
    /// Creates an initializer producing `size` genotypes of `dims` genes.
    #[must_use]
    pub const fn new(dims: usize, size: usize, bounds: Bounds) -> Self {
        Self { dims, size, bounds }
    }

    /// Appends `size` fresh genotypes to `out`.
    pub fn process<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<FloatGenotype>) {
        out.reserve(self.size);
        for _ in 0..self.size {
            let genes = (0..self.dims).map(|_| self.bounds.sample(rng)).collect();
            out.push(FloatGenotype::new(genes));
        }
    }
}

impl Default for FloatInitializer {
    fn default() -> Self {
        Self::new(3, 100, Bounds::default())
    }
}

/// Appends uniformly shuffled permutation genotypes.
#[derive(Clone, Copy, Debug)]
pub struct PermutationInitializer {
    length: usize,
    size: usize,
}

impl PermutationInitializer {
    /// Creates an initializer producing `size` orderings of `0..length`.
    #[must_use]
    pub const fn new(length: usize, size: usize) -> Self {
        Self { length, size }
    }

    /// Appends `size` fresh genotypes to `out`.
    pub fn process<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut Vec<PermutationGenotype>) {
        out.reserve(self.size);
        for _ in 0..self.size {
            out.push(PermutationGenotype::new(gen_permutation(self.length, rng)));
        }
    }
}

/// Returns `0..length` in uniformly random order.
pub fn gen_permutation<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Vec<usize> {
    let mut permutation: Vec<usize> = (0..length).collect();
    permutation.shuffle(rng);
    permutation
}
