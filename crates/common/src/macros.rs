/// Declares structs whose fields are all public.
///
/// Attributes written on a field (doc comments included) are carried over,
/// and a trailing comma after the last field is required.
#[macro_export]
macro_rules! pub_fields_struct {
    {
        $(
            $(#[$($attr:tt)*])*
            struct $name:ident {
                $(
                    $(#[$($field_attr:tt)*])*
                    $field:ident: $t:ty,
                )*
            }
        )*
    } => {
        $(
            $(#[$($attr)*])*
            pub struct $name {
                $(
                    $(#[$($field_attr)*])*
                    pub $field: $t,
                )*
            }
        )*
    }
}

#[cfg(test)]
mod tests {
    pub_fields_struct! {
        #[derive(Debug, Default, PartialEq)]
        struct Partition {
            /// Partition column.
            key: String,
            value: Option<String>,
        }
    }

    #[test]
    fn fields_are_public() {
        let partition = Partition {
            key: "ds".to_string(),
            value: Some("2023-01-01".to_string()),
        };

        assert_eq!(partition.key, "ds");
        assert_ne!(partition, Partition::default());
    }
}
