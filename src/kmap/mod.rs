//! Karnaugh map grid: layout, input cell states and file formats

pub mod grid;
pub mod io;
pub mod layout;

pub use grid::{CellState, KmapGrid};
pub use io::{
    create_example_inputs, decode_share_query, encode_share_query, load_grid_from_file,
    load_problems_from_file, parse_grid_from_string, parse_minterm_list, problems_to_csv,
    save_grid_to_file, save_problems_to_file, ProblemSpec,
};
pub use layout::{
    cell_to_index, index_to_cell, Cell, GridLayout, MAX_GRID_VARIABLES, MIN_GRID_VARIABLES,
    VARIABLE_NAMES,
};
