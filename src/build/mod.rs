//! `make` invocation and linker-output scraping.

mod undefined;

pub use undefined::{
    comment_out_symbols, disable_script_fields, normalize_symbols, parse_undefined_symbols,
    run_make, split_make_args, FIXME_PREFIX,
};
