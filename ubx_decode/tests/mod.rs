mod rxm_sfrbx;
