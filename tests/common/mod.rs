//! A scripted in-memory connection for exercising readers, writers, and the
//! orchestrator without a live database.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dbmeta_migrate::{
    DbConnection, InsertBatch, MetaError, Result, Row, RowStream, SqlValue, TextRow,
};

/// Connection double. Query results are scripted in call order; executed
/// statements, buffered inserts, and flush sizes are recorded for
/// inspection.
pub struct MockConnection {
    pub executed: Vec<String>,
    pub queries: Vec<String>,
    results: VecDeque<Vec<TextRow>>,
    stream: Vec<TextRow>,
    pub flushes: Arc<Mutex<Vec<u64>>>,
    pub inserted: Arc<Mutex<Vec<Vec<SqlValue>>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        MockConnection {
            executed: Vec::new(),
            queries: Vec::new(),
            results: VecDeque::new(),
            stream: Vec::new(),
            flushes: Arc::new(Mutex::new(Vec::new())),
            inserted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the result of the next unscripted `query` call.
    pub fn expect_query(&mut self, columns: &[&str], rows: &[&[Option<&str>]]) {
        let owned = rows
            .iter()
            .map(|row| row.iter().map(|v| v.map(str::to_string)).collect())
            .collect();
        self.results.push_back(make_rows(columns, owned));
    }

    /// Script the rows served by `open_stream`.
    pub fn set_stream(&mut self, columns: &[&str], rows: Vec<Vec<Option<String>>>) {
        self.stream = make_rows(columns, rows);
    }
}

pub fn make_rows(columns: &[&str], rows: Vec<Vec<Option<String>>>) -> Vec<TextRow> {
    let names: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
    rows.into_iter()
        .map(|values| TextRow::new(names.clone(), values).unwrap())
        .collect()
}

impl DbConnection for MockConnection {
    fn execute(&mut self, sql: &str) -> Result<u64> {
        self.executed.push(sql.to_string());
        Ok(0)
    }

    fn query(&mut self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Box<dyn Row>>> {
        self.queries.push(sql.to_string());
        let rows = self
            .results
            .pop_front()
            .ok_or_else(|| MetaError::database_msg(format!("no scripted result for: {sql}")))?;
        Ok(rows
            .into_iter()
            .map(|row| Box::new(row) as Box<dyn Row>)
            .collect())
    }

    fn open_stream(&mut self, _sql: &str, _fetch_size: usize) -> Result<Box<dyn RowStream + '_>> {
        Ok(Box::new(MockStream {
            rows: self.stream.clone().into(),
        }))
    }

    fn prepare_insert(&mut self, _sql: &str) -> Result<Box<dyn InsertBatch + '_>> {
        Ok(Box::new(MockBatch {
            pending: 0,
            flushes: Arc::clone(&self.flushes),
            inserted: Arc::clone(&self.inserted),
        }))
    }
}

struct MockStream {
    rows: VecDeque<TextRow>,
}

impl RowStream for MockStream {
    fn next_row(&mut self) -> Result<Option<Box<dyn Row>>> {
        Ok(self.rows.pop_front().map(|row| Box::new(row) as Box<dyn Row>))
    }
}

struct MockBatch {
    pending: u64,
    flushes: Arc<Mutex<Vec<u64>>>,
    inserted: Arc<Mutex<Vec<Vec<SqlValue>>>>,
}

impl InsertBatch for MockBatch {
    fn append(&mut self, values: Vec<SqlValue>) -> Result<()> {
        self.inserted.lock().unwrap().push(values);
        self.pending += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<u64> {
        let count = self.pending;
        self.pending = 0;
        if count > 0 {
            self.flushes.lock().unwrap().push(count);
        }
        Ok(count)
    }
}
