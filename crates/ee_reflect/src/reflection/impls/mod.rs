mod arrays;
mod values;
