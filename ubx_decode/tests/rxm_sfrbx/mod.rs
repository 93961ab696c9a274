mod gps;
