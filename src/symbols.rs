//! Symbol definitions, weighted selection, and grid generation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GeneratorConfig, GridSpec};

/// A grid symbol: one of nine paying fruits, or the scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    Grapes = 0,
    Orange = 1,
    Lemon = 2,
    Apple = 3,
    Strawberry = 4,
    Cherry = 5,
    Watermelon = 6,
    Peach = 7,
    Pineapple = 8,
    /// Triggers/extends free spins; pays by count, not by cluster
    Scatter = 9,
}

/// The nine paying symbols, in weight-table order
pub const PAYING_SYMBOLS: [Symbol; 9] = [
    Symbol::Grapes,
    Symbol::Orange,
    Symbol::Lemon,
    Symbol::Apple,
    Symbol::Strawberry,
    Symbol::Cherry,
    Symbol::Watermelon,
    Symbol::Peach,
    Symbol::Pineapple,
];

impl Symbol {
    /// Index into the paying-symbol weight tables (None for scatter)
    pub fn pay_index(&self) -> Option<usize> {
        match self {
            Symbol::Scatter => None,
            other => Some(*other as usize),
        }
    }

    /// Short asset name
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Grapes => "grapes",
            Symbol::Orange => "orange",
            Symbol::Lemon => "lemon",
            Symbol::Apple => "apple",
            Symbol::Strawberry => "strawberry",
            Symbol::Cherry => "cherry",
            Symbol::Watermelon => "watermelon",
            Symbol::Peach => "peach",
            Symbol::Pineapple => "pineapple",
            Symbol::Scatter => "scatter",
        }
    }

    /// Is this the scatter symbol?
    pub fn is_scatter(&self) -> bool {
        matches!(self, Symbol::Scatter)
    }
}

/// Weighted random choice over the paying symbols
///
/// Used twice with different tables: normal generation and the forced-win
/// symbol pick. Ties are broken identically in both cases: the draw walks the
/// table in symbol order and takes the first entry that exhausts the roll.
#[derive(Debug, Clone)]
pub struct WeightedTable {
    weights: [u32; 9],
    total: u32,
}

impl WeightedTable {
    pub fn new(weights: [u32; 9]) -> Self {
        let total = weights.iter().sum::<u32>().max(1);
        Self { weights, total }
    }

    /// Draw one paying symbol
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Symbol {
        let mut roll = rng.random::<f64>() * self.total as f64;
        for (i, &w) in self.weights.iter().enumerate() {
            roll -= w as f64;
            if roll <= 0.0 {
                return PAYING_SYMBOLS[i];
            }
        }
        PAYING_SYMBOLS[8]
    }
}

/// An immutable, finalized symbol grid (row-major)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: u8,
    cols: u8,
    cells: Vec<Symbol>,
}

impl Grid {
    /// Build from row-major cells; panics unless the length equals rows × cols
    pub fn new(spec: GridSpec, cells: Vec<Symbol>) -> Self {
        assert_eq!(
            cells.len(),
            spec.total_positions(),
            "grid cells must fill {}×{}",
            spec.rows,
            spec.cols
        );
        Self {
            rows: spec.rows,
            cols: spec.cols,
            cells,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Symbol at (row, col)
    pub fn get(&self, row: u8, col: u8) -> Symbol {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Row-major iteration with positions
    pub fn iter(&self) -> impl Iterator<Item = ((u8, u8), Symbol)> + '_ {
        self.cells.iter().enumerate().map(|(i, &sym)| {
            let row = (i / self.cols as usize) as u8;
            let col = (i % self.cols as usize) as u8;
            ((row, col), sym)
        })
    }

    /// Count occurrences of one symbol
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|&&s| s == symbol).count()
    }

    /// All positions holding one symbol
    pub fn positions_of(&self, symbol: Symbol) -> Vec<(u8, u8)> {
        self.iter()
            .filter(|&(_, s)| s == symbol)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Symbol] {
        &mut self.cells
    }
}

/// Generates fresh grids: each cell independently drawn, scatter first at its
/// flat probability, otherwise a weighted paying symbol
#[derive(Debug, Clone)]
pub struct SymbolGenerator {
    scatter_probability: f64,
    table: WeightedTable,
}

impl SymbolGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            scatter_probability: config.scatter_probability,
            table: WeightedTable::new(config.symbol_weights),
        }
    }

    /// Generate one finalized grid
    pub fn generate<R: Rng>(&self, spec: GridSpec, rng: &mut R) -> Grid {
        let mut cells = Vec::with_capacity(spec.total_positions());
        for _ in 0..spec.total_positions() {
            cells.push(self.draw_cell(rng));
        }
        Grid::new(spec, cells)
    }

    fn draw_cell<R: Rng>(&self, rng: &mut R) -> Symbol {
        if rng.random::<f64>() < self.scatter_probability {
            Symbol::Scatter
        } else {
            self.table.pick(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_grid_indexing() {
        let spec = GridSpec::standard_5x6();
        let mut cells = vec![Symbol::Cherry; 30];
        cells[7] = Symbol::Lemon; // row 1, col 1
        let grid = Grid::new(spec, cells);
        assert_eq!(grid.get(1, 1), Symbol::Lemon);
        assert_eq!(grid.get(0, 0), Symbol::Cherry);
        assert_eq!(grid.count(Symbol::Lemon), 1);
        assert_eq!(grid.positions_of(Symbol::Lemon), vec![(1, 1)]);
    }

    #[test]
    #[should_panic(expected = "grid cells must fill")]
    fn test_grid_rejects_wrong_cell_count() {
        Grid::new(GridSpec::standard_5x6(), vec![Symbol::Cherry; 29]);
    }

    #[test]
    fn test_weighted_table_skew() {
        // All weight on one symbol: the pick is deterministic
        let mut weights = [0u32; 9];
        weights[2] = 10;
        let table = WeightedTable::new(weights);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(table.pick(&mut rng), Symbol::Lemon);
        }
    }

    #[test]
    fn test_generation_reproducible() {
        let generator = SymbolGenerator::new(&GeneratorConfig::default());
        let spec = GridSpec::standard_5x6();

        let a = generator.generate(spec, &mut StdRng::seed_from_u64(99));
        let b = generator.generate(spec, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scatter_frequency_plausible() {
        let generator = SymbolGenerator::new(&GeneratorConfig::default());
        let spec = GridSpec::standard_5x6();
        let mut rng = StdRng::seed_from_u64(1234);

        let mut scatters = 0usize;
        let mut cells = 0usize;
        for _ in 0..2000 {
            let grid = generator.generate(spec, &mut rng);
            scatters += grid.count(Symbol::Scatter);
            cells += spec.total_positions();
        }
        let rate = scatters as f64 / cells as f64;
        // p = 0.01 with generous tolerance
        assert!(rate > 0.005 && rate < 0.02, "scatter rate {}", rate);
    }
}
