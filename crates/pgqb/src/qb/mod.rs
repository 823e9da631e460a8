//! Statement builder.
//!
//! [`Table`] binds a table name, an optional schema and alias, and an explicit
//! column registry. Each clause method walks the [`State`] machine, so clauses
//! can only be appended in an order that produces a valid statement:
//!
//! ```text
//! [WITH] SELECT [DISTINCT [ON]] ... FROM ... [JOIN]* [WHERE] [GROUP BY] [HAVING]
//!        [ORDER BY] [LIMIT] [OFFSET]
//! [WITH] INSERT INTO ... (VALUES ... | SELECT ...) [RETURNING]
//! [WITH] UPDATE ... SET ... [WHERE] [RETURNING]
//! [WITH] DELETE FROM ... [WHERE] [RETURNING]
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pgqb::{qb, Clause, SqlType};
//!
//! let mut users = qb::table("users")
//!     .with_column("name", SqlType::Varchar(Some(64)))
//!     .with_column("age", SqlType::Integer);
//!
//! // SELECT
//! let sql = users.select_all()?.order_by(["-age"])?.to_sql()?;
//! assert_eq!(sql, r#"SELECT "users".* FROM "users" ORDER BY "users"."age" DESC"#);
//!
//! // UPDATE
//! let age = users.col("age")?;
//! let sql = users
//!     .update([age.set(age.add(1)?)?])?
//!     .where_(Clause::new(users.col("name")?.eq("Nikita")?)?)?
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     r#"UPDATE "users" SET "age" = "users"."age" + 1 WHERE "users"."name" = 'Nikita'"#
//! );
//! # Ok::<(), pgqb::QbError>(())
//! ```

mod assign;
mod join;
mod order;
mod state;
mod table;


pub use assign::Assignment;
pub use join::JoinKind;
pub use order::{Direction, OrderItem};
pub use state::State;
pub use table::{Table, table};
