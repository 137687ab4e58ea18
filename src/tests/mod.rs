// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod merge_property_tests;
pub mod scenario_tests;
