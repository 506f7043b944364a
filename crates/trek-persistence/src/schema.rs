//! Esquema Diesel. Reemplazable con `diesel print-schema`.

diesel::table! {
    users (user_id) {
        user_id -> Int4,
        #[max_length = 50]
        username -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        created_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    media_items (media_id) {
        media_id -> Int4,
        user_id -> Int4,
        #[max_length = 255]
        title -> Varchar,
        #[max_length = 10]
        media_type -> Varchar,
        #[max_length = 15]
        status -> Varchar,
        #[max_length = 50]
        current_progress -> Nullable<Varchar>,
        rating -> Nullable<Int4>,
        comment -> Nullable<Text>,
        release_year -> Nullable<Int4>,
        added_date -> Nullable<Timestamp>,
    }
}

diesel::joinable!(media_items -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    media_items,
);
