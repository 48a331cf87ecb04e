mod clock;
mod mutex;
mod semaphore;
