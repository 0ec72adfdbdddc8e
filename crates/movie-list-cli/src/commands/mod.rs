pub mod add;
pub mod all;
pub mod del;
pub mod list;
pub mod purge;

pub use add::run_add;
pub use all::show_all;
pub use del::run_del;
pub use list::show_list;
pub use purge::run_purge;

use crate::output::TerminalTable;

/// Print a rendered table, or the rendering error.
///
/// The data behind the table has already been read, so a rendering failure
/// is reported and otherwise ignored.
fn print_table(table: &TerminalTable) {
    match table.render() {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => println!("ERROR: {e}"),
    }
}
