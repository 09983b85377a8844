pub mod clustersim_vis2d;
