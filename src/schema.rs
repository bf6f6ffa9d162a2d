diesel::table! {
    subscriptions (id) {
        id -> Int8,
        created_at -> Timestamptz,
        customer_name -> Text,
        customer_email -> Nullable<Text>,
        plan_title -> Text,
        plan_price -> Numeric,
        flavor_preference -> Nullable<Text>,
        delivery_day -> Nullable<Text>,
        delivery_time -> Nullable<Text>,
    }
}
