// The class tables are created at runtime, one per class, so only the password table has a
// static schema.

diesel::table! {
    class_passwords (class_name) {
        class_name -> Text,
        password_hash -> Text,
    }
}
