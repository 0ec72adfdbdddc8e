use anyhow::Result;
use movie_list_core::model::MovieList;
use movie_list_core::schema::Database;

use super::print_table;
use crate::output::{TableType, TerminalTable};

pub fn show_all(db: &mut Database, table_type: TableType) -> Result<()> {
    let lists = db.with_session(|session| session.lists())?;

    let table = TerminalTable::new(table_type, header(), rows(&lists));
    print_table(&table);
    Ok(())
}

fn header() -> Vec<String> {
    vec!["#".to_string(), "List Name".to_string()]
}

fn rows(lists: &[MovieList]) -> Vec<Vec<String>> {
    lists
        .iter()
        .map(|list| vec![list.id.to_string(), list.name.clone()])
        .collect()
}
