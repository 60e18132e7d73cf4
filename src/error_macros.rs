//
// src/error_macros.rs
//
// Macros for declaring the error types of src/error.rs. Every error is a
// plain struct with a styled, multi-part `Display` implementation.
//
//
// (C) 2020 Taras Zakharko
//
// This code is licensed under GPL 3.0

macro_rules! fmt_err_msg {
    // error header
    ((@err $($msg:literal)+)) => {
        format!("{} {}",
            ::console::Style::new().red().bold().apply_to("error:"),
            format!(concat!($($msg, " "),+)).trim_end()
        )
    };
    ((@err $($msg:literal)+ [ $($arg:tt)* ])) => {
        format!("{} {}",
            ::console::Style::new().red().bold().apply_to("error:"),
            format!(concat!($($msg, " "),+), $($arg)*).trim_end()
        )
    };
    // a hint shown under the header
    ((@hint $($msg:literal)+ )) => {
        format!(concat!("  ", $($msg, " "),+)).trim_end().to_owned()
    };
    ((@hint $($msg:literal)+ [ $($arg:tt)* ])) => {
        format!(concat!("  ", $($msg, " "),+), $($arg)*).trim_end().to_owned()
    };
    // free-standing body block
    ((@div $($msg:literal)+ )) => {
        format!(concat!($($msg, " "),+)).trim_end().to_owned()
    };
    ((@div $($msg:literal)+ [ $($arg:tt)* ])) => {
        format!(concat!($($msg, " "),+), $($arg)*).trim_end().to_owned()
    };
}


macro_rules! define_error {
    ($name:ident  @display($sel:ident) { $($msg:tt)* }) => {
        #[derive(Debug)]
        pub struct $name;

        impl std::error::Error for $name {}

        impl std::fmt::Display for $name {
            fn fmt(&$sel, __formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                let msg = [$((fmt_err_msg!($msg)),)+].join("\n");

                __formatter.write_str(&msg)
            }
        }
    };
    ($name:ident { $($elem:tt)* } @display($sel:ident) { $($msg:tt)* }) => {
        #[derive(Debug)]
        pub struct $name {
            $($elem)*
        }

        impl std::error::Error for $name {}

        impl std::fmt::Display for $name {
            fn fmt(&$sel, __formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                let msg = [$((fmt_err_msg!($msg)),)+].join("\n");

                __formatter.write_str(&msg)
            }
        }
    };
}
