//! Ready-made patches: a bowl, the same bowl turned over, and a flat
//! unit square.

use crate::surface::{Bicubic, Coefficients};

/// Bowl with `z = 2.5u² - 0.8u + 2.2v² - v + 0.95` spanning (-1.5, -1.75)
/// to (2.5, 1.75) in x and y.
pub fn bowl() -> Bicubic {
    let mut qx: Coefficients = [[0.0; 4]; 4];
    qx[2][3] = 4.0;
    qx[3][3] = -1.5;
    let mut qy: Coefficients = [[0.0; 4]; 4];
    qy[3][2] = 3.5;
    qy[3][3] = -1.75;
    let mut qz: Coefficients = [[0.0; 4]; 4];
    qz[1][3] = 2.5;
    qz[2][3] = -0.8;
    qz[3][1] = 2.2;
    qz[3][2] = -1.0;
    qz[3][3] = 0.95;
    Bicubic::from_coefficients(qx, qy, qz)
}

/// The bowl turned over: same x and y, z curving down towards the edges.
pub fn dome() -> Bicubic {
    let mut dome = bowl();
    dome.qz = [[0.0; 4]; 4];
    dome.qz[1][3] = -2.5;
    dome.qz[2][3] = 2.5;
    dome.qz[3][1] = -2.2;
    dome.qz[3][2] = 2.2;
    dome.qz[3][3] = 0.95;
    dome
}

/// The unit square in the z = 0 plane, `P(u, v) = (u, v, 0)`.
pub fn flat() -> Bicubic {
    let mut qx: Coefficients = [[0.0; 4]; 4];
    qx[2][3] = 1.0;
    let mut qy: Coefficients = [[0.0; 4]; 4];
    qy[3][2] = 1.0;
    Bicubic::from_coefficients(qx, qy, [[0.0; 4]; 4])
}
