//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name (max 64 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        theme -> Varchar,
        default_view -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks owned by a single user.
    tasks (id) {
        id -> Uuid,
        /// Insertion sequence; listings read back in this order.
        seq -> Int8,
        owner_id -> Uuid,
        text -> Text,
        description -> Text,
        /// `pending` or `completed`.
        status -> Varchar,
        /// `low`, `medium` or `high`.
        priority -> Varchar,
        due_date -> Nullable<Timestamptz>,
        categories -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
