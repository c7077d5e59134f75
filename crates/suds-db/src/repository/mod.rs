//! # Repository Module
//!
//! Database repository implementations for SudsPOS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  View-state holder                                                      │
//! │       │                                                                 │
//! │       │  db.transactions().create_with_lines(order, lines)              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                  │
//! │  ├── create_with_lines(..)   one SQL transaction                        │
//! │  ├── update_with_lines(..)   full line replacement, atomic              │
//! │  ├── add_payment(..)                                                    │
//! │  ├── update_status(..)       checked against the transition table       │
//! │  └── watch_all()             live snapshot stream                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database ──► StoreEvents bump ──► every live subscriber         │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place                                         │
//! │  • Write paths and change signals can't drift apart                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`] - Customer CRUD (delete nulls weak references)
//! - [`ServiceRepository`] - Price-list CRUD (soft deactivation, no delete)
//! - [`TransactionRepository`] - Orders, line items, payments, status
//!
//! [`CustomerRepository`]: customer::CustomerRepository
//! [`ServiceRepository`]: service::ServiceRepository
//! [`TransactionRepository`]: transaction::TransactionRepository

pub mod customer;
pub mod service;
pub mod transaction;
