// Released under MIT License.
// Copyright (c) 2023-2024 Ladislav Bartos

//! Small functions and structures for testing purposes.
