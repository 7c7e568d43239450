pub mod compile_time {
    pub mod units {
        /// Root font size used for px <-> rem/em conversion
        pub const BASE_FONT_SIZE_PX: f64 = 16.0;

        /// CSS reference pixel to point ratio (1pt = 4/3 px)
        pub const PX_PER_PT: f64 = 4.0 / 3.0;

        /// Units that convert through the base font size
        pub const LENGTH_UNITS: &[&str] = &["px", "rem", "em", "pt"];
    }

    pub mod viewport {
        /// Default lower viewport bound for fluid interpolation
        pub const DEFAULT_MIN_VIEWPORT_PX: f64 = 320.0;

        /// Default upper viewport bound for fluid interpolation
        pub const DEFAULT_MAX_VIEWPORT_PX: f64 = 1280.0;
    }

    pub mod contrast {
        /// WCAG 2.x thresholds for normal text
        pub const AA_NORMAL: f64 = 4.5;
        pub const AAA_NORMAL: f64 = 7.0;

        /// WCAG 2.x thresholds for large text (>= 18pt or 14pt bold)
        pub const AA_LARGE: f64 = 3.0;
        pub const AAA_LARGE: f64 = 4.5;

        /// Relative luminance where black and white text have equal contrast
        pub const LIGHTNESS_PIVOT: f64 = 0.179;

        /// Bisection steps when searching for a compliant lightness
        pub const MAX_CONTRAST_SEARCH_STEPS: usize = 32;
    }

    pub mod formatting {
        /// Decimal digits kept when formatting dimensions
        pub const DEFAULT_PRECISION: u32 = 4;

        /// Largest precision accepted from configuration
        pub const MAX_PRECISION: u32 = 10;

        /// Decimal digits used for contrast ratios
        pub const RATIO_PRECISION: u32 = 2;
    }

    pub mod logging {
        /// Events retained by in-memory loggers
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Diagnostics retained in a single resolution report
        pub const MAX_DIAGNOSTICS_PER_RESOLUTION: usize = 5_000;
    }
}
