//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// Directory of people, one row per person.
    ///
    /// `manager_id` is a self-referencing foreign key encoding the
    /// organisational forest. It is nullable for roots and deliberately
    /// not cycle-checked at the database level; traversals guard for it.
    people (id) {
        /// Primary key, assigned by the database sequence.
        id -> Int4,
        /// Display name.
        name -> Varchar,
        /// Job title.
        job_title -> Varchar,
        /// Department name.
        department -> Varchar,
        /// The person's manager, null for roots.
        manager_id -> Nullable<Int4>,
        /// Relative path to a profile photo.
        photo_path -> Nullable<Varchar>,
        /// `Employee` or `Partner`.
        person_type -> Varchar,
        /// `Active` or `Inactive`.
        status -> Varchar,
        /// Contact email.
        email -> Nullable<Varchar>,
        /// Contact phone number.
        phone -> Nullable<Varchar>,
        /// Office or city.
        location -> Nullable<Varchar>,
        /// Date the person joined.
        hire_date -> Nullable<Date>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
