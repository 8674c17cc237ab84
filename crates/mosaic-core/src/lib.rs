#![forbid(unsafe_code)]

//! Core: pixel geometry shared by the Mosaic layout engine and its hosts.
//!
//! # Role in Mosaic
//! `mosaic-core` holds the value types that cross the boundary between the
//! layout engine (`mosaic-layout`) and the collaborators around it: the
//! renderer sets viewports from [`geometry::Rect`], panels report their
//! minimum footprint as a [`geometry::Size`], and input code hit-tests
//! pointer positions against resolved rectangles.

pub mod geometry;
